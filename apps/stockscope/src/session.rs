use crate::render;
use anyhow::Context;
use std::str::FromStr;
use std::sync::Arc;
use stockscope_api::StockscopeClient;
use stockscope_api::reports::{DEFAULT_HORIZON_DAYS, Persona};
use stockscope_chart_engine::{PointerEvent, RawTime};
use stockscope_dashboard::{Command, Dashboard, MarketSource, Outcome, Tab, execute};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "\
commands:
  symbol <SYMBOL>                 load a symbol (history, then forecast)
  window <YYYY-MM-DD>             set the chart start; empty clears it
  forecast on|off                 show or hide the forecast overlay
  hover <TIME>                    crosshair at a date, epoch or JSON time
  leave                           crosshair leaves the chart
  tab chart|trends|report         switch tab; trends refreshes on entry
  report [PERSONA] [DAYS]         generate a report for the symbol
  reload                          load the current symbol again
  show                            print the current tab
  status                          one line summary
  tickers                         list available symbols
  help                            this text
  quit                            leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Symbol(String),
    Window(String),
    Forecast(bool),
    Hover(RawTime),
    Leave,
    Tab(Tab),
    Report { persona: Persona, horizon_days: u32 },
    Reload,
    Show,
    Status,
    Tickers,
    Help,
    Quit,
    Empty,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        let input = match word.to_lowercase().as_str() {
            "" => Input::Empty,
            "symbol" | "s" if !rest.is_empty() => Input::Symbol(rest.to_string()),
            "symbol" | "s" => return Err("usage: symbol <SYMBOL>".into()),
            "window" | "w" => Input::Window(rest.to_string()),
            "forecast" | "f" => match rest {
                "on" => Input::Forecast(true),
                "off" => Input::Forecast(false),
                _ => return Err("usage: forecast on|off".into()),
            },
            "hover" | "h" if !rest.is_empty() => Input::Hover(rest.parse().unwrap_or_else(|e| match e {})),
            "hover" | "h" => return Err("usage: hover <TIME>".into()),
            "leave" => Input::Leave,
            "tab" | "t" => Input::Tab(match rest.to_lowercase().as_str() {
                "chart" => Tab::Chart,
                "trends" => Tab::Trends,
                "report" => Tab::Report,
                other => return Err(format!("unknown tab '{other}'")),
            }),
            "report" | "r" => {
                let mut args = rest.split_whitespace();
                let persona = match args.next() {
                    Some(persona) => persona.parse().map_err(|e| format!("{e}"))?,
                    None => Persona::default(),
                };
                let horizon_days = match args.next() {
                    Some(days) => days.parse().map_err(|_| format!("invalid horizon '{days}'"))?,
                    None => DEFAULT_HORIZON_DAYS,
                };
                Input::Report { persona, horizon_days }
            }
            "reload" => Input::Reload,
            "show" => Input::Show,
            "status" => Input::Status,
            "tickers" => Input::Tickers,
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            other => return Err(format!("unknown command '{other}', try help")),
        };
        Ok(input)
    }
}

/// Runs every command to completion, one at a time, applying outcomes as they
/// arrive. Used by the one-shot subcommands.
pub async fn settle<S: MarketSource>(dashboard: &mut Dashboard, source: &S, commands: Vec<Command>) {
    let mut pending = commands;
    while let Some(command) = pending.pop() {
        let outcome = execute(source, command).await;
        pending.extend(dashboard.apply(outcome));
    }
}

fn spawn_commands(client: &Arc<StockscopeClient>, tx: &mpsc::UnboundedSender<Outcome>, commands: Vec<Command>) {
    for command in commands {
        let client = Arc::clone(client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = execute(client.as_ref(), command).await;
            // Receiver only goes away on quit.
            let _ = tx.send(outcome);
        });
    }
}

fn show(dashboard: &Dashboard) {
    match dashboard.tab() {
        Tab::Chart => {
            let points = dashboard.chart_points();
            if points.is_empty() {
                println!("{}", render::status_line(dashboard));
            } else {
                render::chart_table(&points).printstd();
            }
        }
        Tab::Trends => {
            let trends = dashboard.trends();
            match (trends.overview(), trends.momentum()) {
                (Some(overview), Some(momentum)) => {
                    render::overview_table(overview).printstd();
                    render::momentum_table(momentum).printstd();
                }
                _ if trends.is_loading() => println!("trends loading..."),
                _ => println!("trends unavailable: {}", trends.error().unwrap_or("not loaded")),
            }
        }
        Tab::Report => {
            let report = dashboard.report();
            match (report.markdown(), report.error()) {
                (Some(markdown), _) => println!("{markdown}"),
                (None, Some(err)) => println!("report failed: {err}"),
                (None, None) if report.is_loading() => println!("report generating..."),
                (None, None) => println!("no report yet, use: report [PERSONA] [DAYS]"),
            }
        }
    }
}

/// Interactive dashboard over stdin. Fetches run as spawned tasks and report
/// back over a channel, so input stays responsive while they are in flight.
pub async fn run(client: Arc<StockscopeClient>, symbol: Option<String>) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut dashboard = Dashboard::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("stockscope against {} (type help)", client.base_url());
    if let Some(symbol) = symbol {
        spawn_commands(&client, &tx, dashboard.select_symbol(&symbol));
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let input = match line.parse::<Input>() {
                    Ok(input) => input,
                    Err(msg) => {
                        eprintln!("{msg}");
                        continue;
                    }
                };

                let commands = match input {
                    Input::Quit => break,
                    Input::Empty => Vec::new(),
                    Input::Symbol(symbol) => dashboard.select_symbol(&symbol),
                    Input::Window(start) => match dashboard.set_window_start(&start) {
                        Ok(commands) => commands,
                        Err(err) => {
                            eprintln!("{err}");
                            Vec::new()
                        }
                    },
                    Input::Forecast(on) => {
                        dashboard.set_include_forecast(on);
                        show(&dashboard);
                        Vec::new()
                    }
                    Input::Hover(time) => {
                        match dashboard.hover(&PointerEvent::at(time)) {
                            Some(candle) => {
                                render::tooltip_table(candle).printstd();
                            }
                            None => println!("no candle there"),
                        }
                        Vec::new()
                    }
                    Input::Leave => {
                        dashboard.hover(&PointerEvent::left());
                        Vec::new()
                    }
                    Input::Tab(tab) => {
                        let commands = dashboard.activate_tab(tab);
                        if commands.is_empty() {
                            show(&dashboard);
                        }
                        commands
                    }
                    Input::Report { persona, horizon_days } => {
                        let commands = dashboard.request_report(persona, horizon_days);
                        if commands.is_empty() {
                            eprintln!("select a symbol first");
                        }
                        commands
                    }
                    Input::Reload => dashboard.reload(),
                    Input::Show => {
                        show(&dashboard);
                        Vec::new()
                    }
                    Input::Status => {
                        println!("{}", render::status_line(&dashboard));
                        Vec::new()
                    }
                    Input::Tickers => {
                        let client = Arc::clone(&client);
                        tokio::spawn(async move {
                            match client.tickers().await {
                                Ok(tickers) => {
                                    render::tickers_table(&tickers).printstd();
                                }
                                Err(err) => eprintln!("tickers failed: {err}"),
                            }
                        });
                        Vec::new()
                    }
                    Input::Help => {
                        println!("{HELP}");
                        Vec::new()
                    }
                };
                spawn_commands(&client, &tx, commands);
            }
            Some(outcome) = rx.recv() => {
                let panel = match &outcome {
                    Outcome::History(..) | Outcome::Forecast(..) => Tab::Chart,
                    Outcome::Trends(..) => Tab::Trends,
                    Outcome::Report(..) => Tab::Report,
                };
                let commands = dashboard.apply(outcome);
                spawn_commands(&client, &tx, commands);

                if panel == Tab::Chart {
                    println!("{}", render::status_line(&dashboard));
                } else if panel == dashboard.tab() {
                    show(&dashboard);
                }
            }
        }
    }

    Ok(())
}
