use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::signal::unix::{signal as unix_signal, SignalKind};
use tracing::{error, info};
mod config;
mod effect;
mod error;
mod events;
mod host;
mod services;
mod utils;

use config::Config;
use effect::{should_apply, BindingController};
use host::{SimulatedHost, SimulatedHostHandle};
use services::{KwinEffectsClient, WindowSimulator, EFFECT_NAME};

#[derive(Parser, Debug)]
#[command(name = "waymca")]
#[command(about = "Привязка шейдерного эффекта к подходящим окнам KWin")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "waymca.toml", global = true)]
    config: String,

    /// Уровень логирования (по умолчанию logging.level и logging.filter из конфигурации)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    /// Запустить контроллер на симулированном хосте
    #[default]
    Run,
    /// Показать, к каким окнам симуляции применяется эффект
    Check,
    /// Попросить запущенный KWin перечитать настройки эффекта
    Reconfigure,
    /// Переключить эффект в запущенном KWin
    Toggle,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.directives());
    init_tracing(&level, &config.logging.format)?;

    info!("Запуск WayMCA v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    match args.command.unwrap_or_default() {
        Command::Run => run_effect(&args.config, config).await,
        Command::Check => {
            check_windows(&config);
            Ok(())
        }
        Command::Reconfigure => {
            let client = KwinEffectsClient::connect().await?;
            client.reconfigure(EFFECT_NAME).await?;
            Ok(())
        }
        Command::Toggle => {
            let client = KwinEffectsClient::connect().await?;
            client.toggle(EFFECT_NAME).await?;
            Ok(())
        }
    }
}

async fn run_effect(config_path: &str, config: Config) -> Result<()> {
    let host = SimulatedHost::new()
        .with_windows(config.simulation.windows.clone())
        .with_config(config.effect_entries());
    let handle = host.handle();

    let (controller, events) = BindingController::start(host, &config.controller_options());
    info!(
        "Начальная сверка завершена: привязано окон {}",
        controller.bound_windows().len()
    );

    let simulator = WindowSimulator::new(
        handle.clone(),
        config.simulation.windows.clone(),
        config.simulation.event_interval_ms,
    );
    let simulator_handle = tokio::spawn(simulator.run());

    info!("Все сервисы запущены (SIGHUP перечитывает конфигурацию, SIGUSR1 переключает эффект)");

    let mut hangup = unix_signal(SignalKind::hangup())?;
    let mut user1 = unix_signal(SignalKind::user_defined1())?;
    let run = controller.run(events);
    tokio::pin!(run);

    loop {
        tokio::select! {
            _ = &mut run => {
                simulator_handle.abort();
                return Err(waymca_error!(internal, "контроллер остановился раньше сигнала завершения").into());
            }
            _ = hangup.recv() => {
                reload_config(config_path, &handle);
            }
            _ = user1.recv() => {
                info!("Получен SIGUSR1, переключаем эффект");
                handle.request_toggle();
            }
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                    Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
                }

                // Закрытый канал событий выгружает эффект и снимает все привязки
                handle.disconnect();
                let _host = (&mut run).await;
                break;
            }
        }
    }

    simulator_handle.abort();

    info!(
        "WayMCA завершил работу (окон в хосте: {}, живых привязок: {}, вызовов хоста: {})",
        handle.window_count(),
        handle.live_binding_count(),
        handle.call_count()
    );
    Ok(())
}

fn reload_config(config_path: &str, handle: &SimulatedHostHandle) {
    info!("Перечитываем конфигурацию из {}", config_path);

    match Config::load(config_path) {
        Ok(config) => handle.replace_config(config.effect_entries()),
        Err(e) => error!("Конфигурация не применена: {:#}", e),
    }
}

fn check_windows(config: &Config) {
    let windows = if config.simulation.windows.is_empty() {
        services::simulator::fallback_windows()
    } else {
        config.simulation.windows.clone()
    };

    for window in &windows {
        let verdict = if should_apply(Some(window)) {
            "применяется"
        } else {
            "пропускается"
        };
        println!("{:<60} {}", window.to_string(), verdict);
    }
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let full = format == "full";

    tracing_subscriber::registry()
        .with(filter)
        .with((!full).then(|| tracing_subscriber::fmt::layer().compact()))
        .with(full.then(|| tracing_subscriber::fmt::layer()))
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let args = Args::parse_from(["waymca"]);
        assert_eq!(args.command.unwrap_or_default(), Command::Run);
        assert_eq!(args.config, "waymca.toml");
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::parse_from(["waymca", "check", "--config", "other.toml", "--log-level", "debug"]);
        assert_eq!(args.command, Some(Command::Check));
        assert_eq!(args.config, "other.toml");
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
