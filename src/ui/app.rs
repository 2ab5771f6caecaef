//! Main chat application and eframe integration

#[cfg(feature = "audio-io")]
use crate::audio::AudioRecorder;
use crate::audio::{AudioClip, AudioRingBuffer};
use crate::api::HttpAssistantApi;
use crate::config::ClientConfig;
use crate::session::{SessionEvent, SessionHandle, SessionSnapshot, SessionWorker};
use crate::ui::components::{InputAction, InputBar, MessageList};
use crate::ui::theme::Theme;
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Sample rate assumed until a microphone reports its own
const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Poll interval while waiting on the session worker
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Open the chat window; blocks until it is closed
pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let api = HttpAssistantApi::new(config.api.clone());
    info!("Using assistant server at {}", api.base_url());

    let (worker, handle) = SessionWorker::new(
        api,
        config.texts.clone(),
        config.audio.channel_buffer_size,
    );
    // The worker is detached: an in-flight request must not hold up exit
    let _worker_thread = worker.start()?;

    let title = config.texts.assistant_name.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([440.0, 760.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title(title.clone()),
        ..Default::default()
    };

    let app_handle = handle.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(ChatApp::from_creation_context(cc, app_handle, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Window error: {}", e))?;

    let _ = handle.shutdown();
    Ok(())
}

/// Main chat application
pub struct ChatApp {
    handle: SessionHandle,
    config: ClientConfig,
    theme: Theme,
    /// Text field contents
    input_text: String,
    /// A command was queued and its flow has not reported back yet
    awaiting_reply: bool,
    #[cfg(feature = "audio-io")]
    recorder: Option<AudioRecorder>,
    #[cfg_attr(not(feature = "audio-io"), allow(dead_code))]
    audio_tx: Sender<Vec<f32>>,
    audio_rx: Receiver<Vec<f32>>,
    audio_buffer: AudioRingBuffer,
    sample_rate: u32,
}

impl ChatApp {
    /// Create the app around a running session worker
    pub fn new(handle: SessionHandle, config: ClientConfig) -> Self {
        let (audio_tx, audio_rx) = bounded(config.audio.channel_buffer_size);
        let audio_buffer =
            AudioRingBuffer::for_duration(config.audio.max_recording_secs, DEFAULT_SAMPLE_RATE);

        Self {
            handle,
            config,
            theme: Theme::farm(),
            input_text: String::new(),
            awaiting_reply: false,
            #[cfg(feature = "audio-io")]
            recorder: None,
            audio_tx,
            audio_rx,
            audio_buffer,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Create the app and apply the theme to the eframe context
    pub fn from_creation_context(
        cc: &eframe::CreationContext<'_>,
        handle: SessionHandle,
        config: ClientConfig,
    ) -> Self {
        let app = Self::new(handle, config);
        app.theme.apply(&cc.egui_ctx);
        app
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Render one frame
    pub fn show(&mut self, ctx: &egui::Context) {
        self.poll_events();
        self.process_audio();

        let snapshot = self.handle.state().snapshot();

        self.show_header(ctx);
        let action = self.show_input_area(ctx, &snapshot);
        self.show_content(ctx, &snapshot);
        self.show_alert(ctx, &snapshot);

        self.handle_action(action);

        if self.awaiting_reply || snapshot.busy || snapshot.voice.is_recording() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }

    fn poll_events(&mut self) {
        while let Some(event) = self.handle.try_recv_event() {
            match event {
                SessionEvent::StateChanged => {}
                SessionEvent::FlowFinished(outcome) => {
                    debug!("Flow finished: {:?}", outcome);
                    self.awaiting_reply = false;
                }
                SessionEvent::Shutdown => {
                    warn!("Session worker has stopped");
                    self.awaiting_reply = false;
                }
            }
        }
    }

    /// Move captured chunks into the recording buffer
    fn process_audio(&mut self) {
        while let Ok(samples) = self.audio_rx.try_recv() {
            self.audio_buffer.write(&samples);
        }
    }

    fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::None => {}
            InputAction::Send(text) => match self.handle.send_text(text) {
                Ok(()) => self.awaiting_reply = true,
                Err(e) => error!("Failed to queue text: {}", e),
            },
            InputAction::StartRecording => self.start_recording(),
            InputAction::StopRecording => self.stop_recording(),
        }
    }

    fn start_recording(&mut self) {
        if !self.handle.start_recording() {
            debug!("Recording refused in the current state");
            return;
        }

        // Drop leftovers from a previous capture
        while self.audio_rx.try_recv().is_ok() {}
        self.audio_buffer.clear();

        match self.open_microphone() {
            Ok(()) => info!("Recording started at {}Hz", self.sample_rate),
            Err(e) => {
                error!("Failed to start recording: {}", e);
                self.handle.cancel_recording();
                self.handle
                    .raise_alert(self.config.texts.alert_recording_failed.clone());
            }
        }
    }

    fn stop_recording(&mut self) {
        if !self.handle.state().voice_phase().is_recording() {
            return;
        }

        self.close_microphone();
        self.process_audio();

        let evicted = self.audio_buffer.evicted();
        if evicted > 0 {
            warn!(
                "Recording exceeded {}s, dropped its first {:.1}s",
                self.config.audio.max_recording_secs,
                evicted as f32 / self.sample_rate as f32
            );
        }

        let clip = AudioClip::new(self.audio_buffer.drain(), self.sample_rate, 1);
        info!("Recording stopped: {:.1}s", clip.duration_seconds());

        match self.handle.send_voice(clip) {
            Ok(()) => self.awaiting_reply = true,
            Err(e) => {
                error!("Failed to queue recording: {}", e);
                self.handle.cancel_recording();
                self.handle
                    .raise_alert(self.config.texts.alert_voice_failed.clone());
            }
        }
    }

    #[cfg(feature = "audio-io")]
    fn open_microphone(&mut self) -> Result<()> {
        if self.recorder.is_none() {
            self.recorder = Some(AudioRecorder::new()?);
        }

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.start(self.audio_tx.clone())?;
            if recorder.sample_rate() != self.sample_rate {
                self.sample_rate = recorder.sample_rate();
                self.audio_buffer = AudioRingBuffer::for_duration(
                    self.config.audio.max_recording_secs,
                    self.sample_rate,
                );
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "audio-io"))]
    fn open_microphone(&mut self) -> Result<()> {
        Err(crate::ChatError::AudioDevice(
            "built without microphone support".to_string(),
        ))
    }

    fn close_microphone(&mut self) {
        #[cfg(feature = "audio-io")]
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.stop() {
                error!("Failed to stop recording: {}", e);
            }
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.surface)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing, 12.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    egui::Frame::none()
                        .fill(self.theme.accent_soft)
                        .rounding(self.theme.button_rounding)
                        .inner_margin(6.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new("🐄").size(22.0));
                        });

                    ui.label(
                        RichText::new(&self.config.texts.assistant_name)
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_title),
                    );
                });
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context, snapshot: &SessionSnapshot) -> InputAction {
        let mut action = InputAction::None;

        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                action = InputBar::new(
                    &mut self.input_text,
                    snapshot,
                    &self.config.texts,
                    &self.theme,
                )
                .show(ui);
            });

        action
    }

    fn show_content(&self, ctx: &egui::Context, snapshot: &SessionSnapshot) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing, 0.0)),
            )
            .show(ctx, |ui| {
                MessageList::new(snapshot, &self.config.texts, &self.theme).show(ui);
            });
    }

    fn show_alert(&self, ctx: &egui::Context, snapshot: &SessionSnapshot) {
        let Some(body) = &snapshot.alert else {
            return;
        };

        egui::Window::new(self.config.texts.alert_title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(body).color(self.theme.text_primary));
                ui.add_space(self.theme.spacing_sm);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.handle.dismiss_alert();
                    }
                });
            });
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.close_microphone();
        if let Err(e) = self.handle.shutdown() {
            debug!("Session worker already gone: {}", e);
        }
        info!("Chat window closed");
    }
}
