//! Entry point. Wires console -> parser -> session (calculator) -> render,
//! with the insight provider running beside it.

mod calculator;
mod config;
mod console;
mod insight;
mod parser;
mod render;
mod session;
mod types;
mod utils;

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::insight::InsightError;
use crate::session::Session;
use crate::types::Edit;
use crate::utils::sanitize_label;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // Load config
    let cfg_arg = std::env::args().nth(1);
    let (cfg, source) = AppConfig::discover(cfg_arg.as_deref())?;
    match &source {
        Some(p) => info!("Config loaded from {}", p.display()),
        None => info!("No config.yaml found, using built-in defaults"),
    }

    // Provider is injected here; the calculator never sees it.
    let api_key = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .ok();
    let provider = insight::provider_from_config(&cfg.insight, api_key);
    info!("Insight provider: {}", provider.name());

    let mut session = Session::new(cfg.defaults.to_input());
    print_session(&session, &cfg);

    // Console -> internal MPSC
    let (tx, mut rx) = mpsc::channel::<Edit>(64);
    let console_handle = tokio::spawn(async move {
        if let Err(e) = console::run(tx).await {
            error!("Console read error: {:#}", e);
        }
    });

    // Insight outcomes come back tagged with their request id.
    let (insight_tx, mut insight_rx) = mpsc::channel::<(u64, Result<String, InsightError>)>(16);

    loop {
        tokio::select! {
            maybe = rx.recv() => {
                let Some(edit) = maybe else { break; };
                match edit {
                    Edit::Quit => break,
                    Edit::Help => println!("{}", parser::HELP),
                    Edit::Show => print_session(&session, &cfg),
                    Edit::Analyze { label } => {
                        let label = sanitize_label(label.as_deref().unwrap_or(""), &cfg.insight.asset_label);
                        let Some(req) = session.begin_insight(&label) else {
                            warn!("Nothing to analyze: enter positive buy price and amount first");
                            continue;
                        };
                        println!("{}", render::render_insight(session.insight()));
                        debug!("Insight request {} for snapshot {}", req.id, req.generation);

                        let provider_c = Arc::clone(&provider);
                        let tx_c = insight_tx.clone();
                        tokio::spawn(async move {
                            let outcome = provider_c.analyze(&req.snapshot).await;
                            let _ = tx_c.send((req.id, outcome)).await;
                        });
                    }
                    edit => {
                        if session.apply(&edit) {
                            debug!("Recomputed snapshot {}", session.generation());
                            if session.entered_degenerate_fee() {
                                warn!(
                                    "Fee {}% makes break-even undefined or negative",
                                    session.input().fee_percentage
                                );
                            }
                            print_session(&session, &cfg);
                        }
                    }
                }
            }

            Some((request_id, outcome)) = insight_rx.recv() => {
                if session.resolve_insight(request_id, outcome) {
                    info!("Insight request {} resolved", request_id);
                    println!("{}", render::render_insight(session.insight()));
                }
            }
        }
    }

    console_handle.abort();
    Ok(())
}

fn print_session(session: &Session, cfg: &AppConfig) {
    println!("{}", render::render_input(session.input()));
    println!(
        "{}",
        render::render_result(session.input(), session.result(), &cfg.display)
    );
}
