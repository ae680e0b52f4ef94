// ============================================================================
// Longview - Dashboard de performance long terme
// ============================================================================
// Deux modes :
// - TUI (par défaut) : formulaire + graphiques + table, recalcul à chaque
//   changement d'entrée
// - report : calcul unique, sortie texte ou JSON
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : le calcul tourne dans un worker avec son runtime tokio
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use longview::analysis::Dashboard;
use longview::api::{CachedSource, YahooClient};
use longview::app::App;
use longview::config::{Cli, Commands, ReportArgs, Settings};
use longview::models::{DashboardReport, Query};
use longview::ui::{render, render_text, Event, EventHandler};

/// Pile de sources utilisée par le binaire : Yahoo derrière le cache
type LiveDashboard = Dashboard<CachedSource<YahooClient>>;

// ============================================================================
// AppCommand / AppResult : échanges avec le worker thread
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Calculer le rapport d'une requête
    /// - id : numéro de requête (les résultats périmés sont ignorés par App)
    /// - force : vider le cache avant le calcul
    Compute { id: u64, query: Query, force: bool },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    Computed {
        id: u64,
        result: Result<DashboardReport, String>,
    },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier, avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/longview/logs/longview.log
/// RUST_LOG=longview=trace longview
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "longview.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour longview, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "longview=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings();

    init_logging(&settings.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        concurrency = settings.concurrency,
        cache_ttl_secs = settings.cache_ttl.as_secs(),
        "Longview starting up"
    );

    let dashboard = build_dashboard(&settings)?;

    match cli.command {
        Some(Commands::Report(args)) => run_report(dashboard, &args),
        Some(Commands::Tui) | None => run_tui(dashboard),
    }
}

/// Yahoo Finance + cache mémoire + fan-out borné
fn build_dashboard(settings: &Settings) -> Result<LiveDashboard> {
    let client = YahooClient::new().context("Échec de la création du client Yahoo Finance")?;
    let source = CachedSource::new(client, settings.cache_ttl);
    Ok(Dashboard::new(source, settings.concurrency))
}

// ============================================================================
// Mode report
// ============================================================================

fn run_report(dashboard: LiveDashboard, args: &ReportArgs) -> Result<()> {
    let query = args.query();
    info!(?query, json = args.json, "Running headless report");

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let report = runtime.block_on(dashboard.handle(&query)).map_err(|e| {
        error!(error = %e.user_message(), "Report failed");
        anyhow::anyhow!(e.user_message())
    })?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Échec de la sérialisation JSON")?;
        println!("{}", json);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}

// ============================================================================
// Mode TUI
// ============================================================================

fn run_tui(dashboard: LiveDashboard) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // App partagée entre l'event loop et le rendu
    let app = Arc::new(Mutex::new(App::new()));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(runtime, dashboard, command_rx, result_tx);

    // Premier calcul avec les entrées par défaut
    {
        let mut app_lock = lock(&app);
        send_compute(&mut app_lock, &command_tx, false);
    }

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Verrouille l'état partagé, même après un panic dans un autre thread
fn lock(app: &Mutex<App>) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Démarre une requête dans App et l'envoie au worker
fn send_compute(app: &mut App, command_tx: &mpsc::Sender<AppCommand>, force: bool) {
    let (id, query) = app.begin_request();
    info!(id, ?query, force, "Requesting dashboard computation");
    if command_tx.send(AppCommand::Compute { id, query, force }).is_err() {
        error!("Worker thread is gone, cannot compute");
        app.accept_result(id, Err("Background worker stopped".to_string()));
    }
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// - Thread séparé avec son runtime tokio
// - Reçoit des AppCommand, renvoie des AppResult
// - Le calcul (fan-out réseau) ne bloque jamais l'UI
// ============================================================================

fn spawn_background_worker(
    runtime: tokio::runtime::Runtime,
    dashboard: LiveDashboard,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        while let Ok(mut command) = command_rx.recv() {
            // Ne garde que la commande la plus récente : les autres sont périmées
            while let Ok(newer) = command_rx.try_recv() {
                debug!(?command, "Skipping superseded command");
                command = match (command, newer) {
                    (
                        AppCommand::Compute { force: old_force, .. },
                        AppCommand::Compute { id, query, force },
                    ) => AppCommand::Compute {
                        id,
                        query,
                        force: force || old_force,
                    },
                };
            }

            info!(?command, "Worker received command");

            match command {
                AppCommand::Compute { id, query, force } => {
                    let result = runtime.block_on(async {
                        if force {
                            info!("Clearing price cache");
                            dashboard.source().clear().await;
                        }
                        dashboard.handle(&query).await
                    });

                    let result = match result {
                        Ok(report) => {
                            info!(id, rows = report.rows().len(), "Dashboard computed");
                            Ok(report)
                        }
                        Err(e) => {
                            warn!(id, error = %e.user_message(), "Dashboard computation failed");
                            Err(e.user_message())
                        }
                    };

                    if result_tx.send(AppResult::Computed { id, result }).is_err() {
                        break;
                    }
                }
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Traiter les résultats du worker
//   2. Dessiner l'interface (render)
//   3. Traiter les événements (input)
//   4. Mettre à jour l'état (update)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        if !lock(&app).is_running() {
            break;
        }

        // 0. RÉSULTATS
        match result_rx.try_recv() {
            Ok(AppResult::Computed { id, result }) => {
                let mut app_lock = lock(&app);
                if !app_lock.accept_result(id, result) {
                    debug!(id, "Ignoring stale result");
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // 1. RENDER
        {
            let app_lock = lock(&app);
            terminal.draw(|frame| render(frame, &app_lock))?;
        }

        // 2. INPUT
        match events.next() {
            Ok(event) => {
                let mut app_lock = lock(&app);
                handle_event(&mut app_lock, event, &command_tx);
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read terminal event");
            }
        }

        // 3. UPDATE
        lock(&app).tick();
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// Le mode input passe en premier : les lettres y sont du texte, pas des
/// raccourcis.
fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<AppCommand>) {
    use longview::ui::events::{
        get_char_from_event, is_backspace_event, is_down_event, is_enter_event,
        is_escape_event, is_force_reload_event, is_input_char_event, is_next_interval_event,
        is_next_panel_event, is_previous_interval_event, is_quit_event, is_reload_event,
        is_toggle_view_event, is_up_event,
    };

    // ========================================
    // Input Mode : Gestion de la saisie
    // ========================================
    if app.is_in_input_mode() {
        match event {
            Event::Key(_) if is_escape_event(&event) => {
                info!("User cancelled input");
                app.cancel_input();
            }
            Event::Key(_) if is_enter_event(&event) => {
                if app.submit_input() {
                    info!(query = ?app.query(), "User changed an input");
                    send_compute(app, command_tx, false);
                }
            }
            Event::Key(_) if is_backspace_event(&event) => app.backspace(),
            Event::Key(_) if is_input_char_event(&event) => {
                if let Some(c) = get_char_from_event(&event) {
                    app.append_char(c);
                }
            }
            _ => {}
        }
        return;
    }

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_up_event(&event) => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) => {
            app.cancel_quit();
            app.navigate_down();
        }

        Event::Key(_) if is_enter_event(&event) => {
            app.cancel_quit();
            debug!(field = ?app.selected(), "User started editing");
            app.start_input();
        }

        Event::Key(_) if is_next_interval_event(&event) => {
            app.cancel_quit();
            if app.increase_interval() {
                info!(interval = app.interval, "User increased interval");
                send_compute(app, command_tx, false);
            }
        }
        Event::Key(_) if is_previous_interval_event(&event) => {
            app.cancel_quit();
            if app.decrease_interval() {
                info!(interval = app.interval, "User decreased interval");
                send_compute(app, command_tx, false);
            }
        }

        Event::Key(_) if is_toggle_view_event(&event) => {
            app.cancel_quit();
            app.toggle_view();
            info!(view = app.view.label(), "User toggled view");
            send_compute(app, command_tx, false);
        }

        Event::Key(_) if is_next_panel_event(&event) => {
            app.cancel_quit();
            app.next_panel();
        }

        Event::Key(_) if is_reload_event(&event) => {
            app.cancel_quit();
            send_compute(app, command_tx, false);
        }
        Event::Key(_) if is_force_reload_event(&event) => {
            app.cancel_quit();
            send_compute(app, command_tx, true);
        }

        Event::Tick => {}

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
