use crate::canvas::canvas_to_cells;
use crate::cli::Args;
use crate::config::{load_or_create, project_paths, Settings};
use crate::input::{collect_input_nonblocking, map_event_to_intent, Intent};
use crate::logging::init_logging;
use crate::terminal::{draw_text, Terminal};
use chrono::{Local, Offset, Utc};
use crossterm::style::Color;
use heliorama::{replay_all, KeplerEphemeris, Planetarium, Viewport, FRAMES_PER_SECOND};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace};

const HELP: &str = "space play/pause  \u{2190}/\u{2192} speed  i inner  h help  q quit";

pub(crate) struct App {
    settings: Settings,
    planetarium: Planetarium<KeplerEphemeris>,
    term: Terminal,
    show_help: bool,
    should_quit: bool,
}

impl App {
    fn init(args: Args) -> anyhow::Result<Self> {
        let paths = project_paths(args.config_dir.as_deref())?;
        let mut settings = load_or_create(&paths.settings_path)?;
        settings.apply_cli_overrides(&args);

        let log_path = args.log_file.clone().unwrap_or(paths.log_path);
        if !init_logging(&log_path, &settings.log_level) {
            eprintln!("heliorama: cannot write log file {}, logging disabled", log_path.display());
        }
        info!(path = %paths.settings_path.display(), ?settings, "starting");

        let start = settings.start_time.unwrap_or_else(Utc::now);
        let sampling = Instant::now();
        let mut planetarium = Planetarium::new(start, KeplerEphemeris)?
            .with_display_offset(Local::now().offset().fix());
        info!(
            elapsed_ms = sampling.elapsed().as_millis() as u64,
            "planetarium ready"
        );

        if settings.only_inner {
            planetarium.toggle_only_inner();
        }
        if !settings.start_paused {
            planetarium.toggle_play_pause();
        }

        let term = Terminal::begin()?;

        Ok(Self {
            show_help: settings.show_help,
            settings,
            planetarium,
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f64(1.0 / FRAMES_PER_SECOND);

        while !self.should_quit {
            let frame_start = Instant::now();
            let resized = self.term.resize_if_needed()?;
            if resized {
                debug!(cols = self.term.cols, rows = self.term.rows, "terminal resized");
            }

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(intent) = map_event_to_intent(&ev) {
                    self.apply(intent);
                }
            }

            self.planetarium.tick();
            self.render_frame(!resized)?;

            if !wait_for_frame(frame_start + frame_dt) {
                trace!(
                    frame_ms = frame_start.elapsed().as_millis() as u64,
                    "frame over budget"
                );
            }
        }
        Ok(())
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::TogglePlay => {
                let running = self.planetarium.toggle_play_pause();
                debug!(running, "play/pause");
            }
            Intent::FastForward => {
                self.planetarium.fast_forward();
                debug!(speed = self.planetarium.clock().speed_label(), "fast forward");
            }
            Intent::Rewind => {
                self.planetarium.rewind();
                debug!(speed = self.planetarium.clock().speed_label(), "rewind");
            }
            Intent::ToggleInner => {
                self.planetarium.toggle_only_inner();
            }
            Intent::ToggleHelp => self.show_help = !self.show_help,
            Intent::Quit => self.should_quit = true,
        }
    }

    fn render_frame(&mut self, diff_only: bool) -> anyhow::Result<()> {
        let color = self.settings.enable_color;
        self.term.cur.clear(Color::Black);
        self.term.canvas.clear();

        let viewport = Viewport::new(self.term.canvas.w as f32, self.term.canvas.h as f32);
        let commands = self.planetarium.render(viewport)?;
        replay_all(&commands, &mut self.term.canvas);
        canvas_to_cells(&self.term.canvas, &mut self.term.cur, color);
        self.term.canvas.overlay_text(&mut self.term.cur, color);

        // Play button shows what a press would do.
        let button = if self.planetarium.clock().is_running() {
            "\u{23F8}"
        } else {
            "\u{25B6}"
        };
        let status = if self.show_help {
            format!("{button}  {HELP}")
        } else {
            button.to_string()
        };
        let bottom = self.term.rows.saturating_sub(1);
        draw_text(&mut self.term.cur, 1, bottom, &status, Color::White, Some(Color::Black));

        self.term.present(diff_only)
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let mut app = App::init(args)?;
    let res = app.run();
    if let Err(ref e) = res {
        error!(error = %e, "frame loop failed");
    }
    let restored = app.term.end();
    info!("exiting");
    res.and(restored)
}

/// Waits for the frame deadline: coarse sleeps, then a short spin. Returns
/// false when the frame already overran.
fn wait_for_frame(deadline: Instant) -> bool {
    if Instant::now() >= deadline {
        return false;
    }
    loop {
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        if deadline - now > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
