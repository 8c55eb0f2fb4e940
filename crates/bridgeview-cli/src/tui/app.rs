//! TUI application state and event loop.
//!
//! A background thread polls the bridge on a fixed interval and publishes the
//! freshly fetched window into shared state; the UI thread adopts it between
//! frames. Mouse movement is routed to whichever chart the pointer is over so
//! hover inspection works the same way it does in the web dashboard.

use std::io;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use bridgeview_core::{Dashboard, Margins, Sample};

use crate::client::{self, BridgeClient};

// ---------------------------------------------------------------------------
// SharedState — written by the poller thread
// ---------------------------------------------------------------------------

struct SharedState {
    window: Vec<Sample>,
    /// Bumped on every successful fetch so the UI thread knows when to adopt.
    refreshes: u64,
    last_error: Option<String>,
    /// One-line status from the last export, shown in the title bar.
    status: Option<String>,
}

/// Shared state the UI needs, captured in a single lock per frame.
pub struct Snapshot {
    pub refreshes: u64,
    pub last_error: Option<String>,
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    client: Arc<BridgeClient>,
    refresh_rate: Duration,
    pub dash: Dashboard,
    shared: Arc<Mutex<SharedState>>,
    poller_stop: Arc<AtomicBool>,
    running: bool,
    paused: bool,
    seen_refreshes: u64,
    /// Inner chart rectangles from the last frame, for routing mouse events.
    pub chart_areas: Vec<(usize, Rect)>,
}

impl App {
    pub fn new(client: BridgeClient, refresh_secs: f64) -> Self {
        Self {
            client: Arc::new(client),
            refresh_rate: Duration::from_secs_f64(refresh_secs.max(0.1)),
            dash: Dashboard::new(Margins::COMPACT),
            shared: Arc::new(Mutex::new(SharedState {
                window: Vec::new(),
                refreshes: 0,
                last_error: None,
                status: None,
            })),
            poller_stop: Arc::new(AtomicBool::new(false)),
            running: true,
            paused: false,
            seen_refreshes: 0,
            chart_areas: Vec::new(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(
                io::stdout(),
                DisableMouseCapture,
                LeaveAlternateScreen,
                crossterm::cursor::Show
            );
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        // The bridge only collects once asked; the trigger is idempotent.
        self.client.start_metrics();
        self.spawn_poller();

        while self.running {
            self.adopt_window();
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code);
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        self.poller_stop.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn spawn_poller(&self) {
        let client = Arc::clone(&self.client);
        let shared = Arc::clone(&self.shared);
        let stop = Arc::clone(&self.poller_stop);
        let interval = self.refresh_rate;

        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                match client.fetch_window() {
                    Ok(window) => {
                        let mut s = shared.lock().unwrap();
                        s.window = window;
                        s.refreshes += 1;
                        s.last_error = None;
                    }
                    Err(e) => {
                        log::warn!("fetch failed: {e}");
                        shared.lock().unwrap().last_error = Some(e.to_string());
                    }
                }

                // Chunked sleep so quitting does not wait out a long interval.
                let mut remaining = interval;
                while remaining > Duration::ZERO && !stop.load(Ordering::Relaxed) {
                    let step = remaining.min(Duration::from_millis(100));
                    thread::sleep(step);
                    remaining = remaining.saturating_sub(step);
                }
            }
        });
    }

    /// Adopt the latest fetched window, replacing the displayed one wholesale.
    fn adopt_window(&mut self) {
        if self.paused {
            return;
        }
        let s = match self.shared.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if s.refreshes > self.seen_refreshes {
            self.seen_refreshes = s.refreshes;
            let window = s.window.clone();
            drop(s);
            self.dash.update(window);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('p') => self.paused = !self.paused,
            KeyCode::Char('e') => self.export_snapshot(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Moved | MouseEventKind::Drag(_)
        ) {
            return;
        }
        let now = Instant::now();
        let (col, row) = (mouse.column, mouse.row);
        let areas = self.chart_areas.clone();
        for (view, rect) in areas {
            let inside = col >= rect.x
                && col < rect.x + rect.width
                && row >= rect.y
                && row < rect.y + rect.height;
            if inside {
                // Cell centers, in the same units the chart was drawn in.
                let pos = (
                    (col - rect.x) as f64 + 0.5,
                    (row - rect.y) as f64 + 0.5,
                );
                self.dash.pointer_moved(view, pos, now);
            } else {
                self.dash.pointer_left(view);
            }
        }
    }

    /// Write the current payload to a date-stamped file, off-thread so a slow
    /// bridge never freezes the UI.
    fn export_snapshot(&self) {
        let http = Arc::clone(&self.client);
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || {
            let message = match http.fetch_raw() {
                Ok(payload) => {
                    let path =
                        client::export_file_name(time::OffsetDateTime::now_utc().date());
                    match std::fs::write(&path, payload) {
                        Ok(()) => format!("exported {path}"),
                        Err(e) => format!("export failed: {e}"),
                    }
                }
                Err(e) => format!("export failed: {e}"),
            };
            if let Ok(mut s) = shared.lock() {
                s.status = Some(message);
            }
        });
    }

    // --- Accessors for the renderer ---

    pub fn url(&self) -> &str {
        self.client.base()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn refresh_rate_secs(&self) -> f64 {
        self.refresh_rate.as_secs_f64()
    }

    /// Capture shared state in a single mutex lock for one UI frame.
    pub fn snapshot(&self) -> Snapshot {
        let s = match self.shared.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Snapshot {
            refreshes: s.refreshes,
            last_error: s.last_error.clone(),
            status: s.status.clone(),
        }
    }
}
