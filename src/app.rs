//! Overlay application: polls the worker's channel and renders feedback.
//!
//! The overlay is the consumer side of the producer/consumer handoff. It
//! redraws on a fixed refresh interval, colors each line by the message's
//! severity tag, and runs the rest-break timer: when the configured interval
//! elapses the worker is paused and a break card is shown until the user
//! acknowledges it.

use crate::config::Config;
use crate::constants::REST_INTERVAL_CHOICES_MIN;
use crate::status::{Severity, StatusMessage};
use crate::worker::{StatusChannel, WorkerControls};
use crate::Result;
use log::info;
use opencv::{
    core::{Mat, Point, Scalar, CV_8UC3},
    highgui::{self, WINDOW_AUTOSIZE},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WINDOW_NAME: &str = "Sit Smart Coach";

const PANEL_WIDTH: i32 = 420;
const PANEL_HEIGHT: i32 = 220;
const LINE_HEIGHT: i32 = 40;

/// Overlay window polling the status channel on a fixed timer
pub struct OverlayApp {
    channel: Arc<StatusChannel>,
    controls: WorkerControls,
    refresh_ms: i32,
    rest_interval: Duration,
    messages: Vec<StatusMessage>,
    in_rest: bool,
    next_rest: Instant,
}

impl OverlayApp {
    /// Create the overlay window
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn new(config: &Config, channel: Arc<StatusChannel>, controls: WorkerControls) -> Result<Self> {
        highgui::named_window(WINDOW_NAME, WINDOW_AUTOSIZE)?;

        let rest_interval = config.timing.rest_interval();
        Ok(Self {
            channel,
            controls,
            refresh_ms: config.timing.ui_refresh_ms,
            rest_interval,
            messages: Vec::new(),
            in_rest: false,
            next_rest: Instant::now() + rest_interval,
        })
    }

    /// Run the overlay loop until the user quits
    ///
    /// # Errors
    ///
    /// Returns an error only for rendering failures; worker-side problems
    /// arrive as warning messages, never as errors here.
    pub fn run(&mut self) -> Result<()> {
        info!("Overlay running, refresh every {} ms", self.refresh_ms);

        loop {
            if self.in_rest {
                self.draw_rest_card()?;
            } else {
                if Instant::now() >= self.next_rest {
                    self.begin_rest();
                    continue;
                }
                if let Some(messages) = self.channel.poll() {
                    self.messages = messages;
                }
                self.draw_panel()?;
            }

            let key = highgui::wait_key(self.refresh_ms)?;
            if !self.handle_key(key) {
                break;
            }
        }

        info!("Overlay closed");
        Ok(())
    }

    /// Returns false when the user asked to quit
    fn handle_key(&mut self, key: i32) -> bool {
        match key {
            27 => false, // ESC
            k if k == i32::from(b'q') => false,
            k if k == i32::from(b'b') && self.in_rest => {
                self.end_rest();
                true
            }
            k if (i32::from(b'1')..=i32::from(b'4')).contains(&k) => {
                let choice = (k - i32::from(b'1')) as usize;
                let minutes = REST_INTERVAL_CHOICES_MIN[choice];
                self.rest_interval = Duration::from_secs(minutes * 60);
                if !self.in_rest {
                    self.next_rest = Instant::now() + self.rest_interval;
                }
                info!("Rest interval set to {minutes} minutes");
                true
            }
            _ => true,
        }
    }

    fn begin_rest(&mut self) {
        info!("Rest break started");
        self.in_rest = true;
        self.controls.pause();
    }

    fn end_rest(&mut self) {
        info!("Rest break finished");
        self.in_rest = false;
        self.controls.resume();
        self.next_rest = Instant::now() + self.rest_interval;
        self.messages.clear();
    }

    fn draw_panel(&self) -> Result<()> {
        let mut canvas = Self::blank_canvas()?;

        if self.messages.is_empty() {
            Self::put_line(&mut canvas, "Initializing...", 0, Self::severity_color(Severity::Info))?;
        } else {
            for (line, message) in (0i32..).zip(self.messages.iter().take(3)) {
                Self::put_line(&mut canvas, &message.text, line, Self::severity_color(message.severity))?;
            }
        }

        let remaining = self.next_rest.saturating_duration_since(Instant::now());
        let footer = format!(
            "Break in {:02}:{:02}   [1-4] interval  [q] quit",
            remaining.as_secs() / 60,
            remaining.as_secs() % 60
        );
        let footer_color = Scalar::new(120.0, 120.0, 120.0, 0.0);
        imgproc::put_text(
            &mut canvas,
            &footer,
            Point::new(12, PANEL_HEIGHT - 16),
            FONT_HERSHEY_SIMPLEX,
            0.45,
            footer_color,
            1,
            LINE_8,
            false,
        )?;

        highgui::imshow(WINDOW_NAME, &canvas)?;
        Ok(())
    }

    fn draw_rest_card(&self) -> Result<()> {
        let mut canvas = Self::blank_canvas()?;
        let accent = Scalar::new(60.0, 140.0, 255.0, 0.0);

        imgproc::put_text(
            &mut canvas,
            "Take a break!",
            Point::new(12, 70),
            FONT_HERSHEY_SIMPLEX,
            1.2,
            accent,
            2,
            LINE_8,
            false,
        )?;
        imgproc::put_text(
            &mut canvas,
            "Stretch and relax",
            Point::new(12, 120),
            FONT_HERSHEY_SIMPLEX,
            0.7,
            accent,
            1,
            LINE_8,
            false,
        )?;
        imgproc::put_text(
            &mut canvas,
            "[b] back to work",
            Point::new(12, PANEL_HEIGHT - 16),
            FONT_HERSHEY_SIMPLEX,
            0.5,
            Scalar::new(120.0, 120.0, 120.0, 0.0),
            1,
            LINE_8,
            false,
        )?;

        highgui::imshow(WINDOW_NAME, &canvas)?;
        Ok(())
    }

    fn blank_canvas() -> Result<Mat> {
        Mat::new_rows_cols_with_default(
            PANEL_HEIGHT,
            PANEL_WIDTH,
            CV_8UC3,
            Scalar::new(32.0, 32.0, 32.0, 0.0),
        )
        .map_err(Into::into)
    }

    fn put_line(canvas: &mut Mat, text: &str, line: i32, color: Scalar) -> Result<()> {
        imgproc::put_text(
            canvas,
            text,
            Point::new(12, 36 + line * LINE_HEIGHT),
            FONT_HERSHEY_SIMPLEX,
            0.8,
            color,
            2,
            LINE_8,
            false,
        )?;
        Ok(())
    }

    /// Severity to BGR color
    fn severity_color(severity: Severity) -> Scalar {
        match severity {
            Severity::Ok => Scalar::new(80.0, 200.0, 80.0, 0.0),
            Severity::Warning => Scalar::new(60.0, 200.0, 255.0, 0.0),
            Severity::Info => Scalar::new(255.0, 180.0, 90.0, 0.0),
        }
    }
}
