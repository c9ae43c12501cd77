//! Trading competition leaderboard bot CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 봇 실행 (명령어 응답 + 6시간마다 PnL 리더보드 푸시)
//! leaderboard-bot run
//!
//! # 거래량 리더보드를 한 번 출력
//! leaderboard-bot print --metric volume
//!
//! # PnL 리더보드를 대상 채팅에 한 번 전송
//! leaderboard-bot push
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use leaderboard_bot::{push_once, AppContext, BotConfig, BotError, ScheduledPush};
use leaderboard_core::{init_logging, LogConfig, Metric};
use leaderboard_data::SubgraphClient;
use leaderboard_notification::{NotificationSender, TelegramBotHandler, TelegramSender};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "leaderboard-bot")]
#[command(about = "Trading competition leaderboard Telegram bot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 봇 실행: 명령어 응답 + 정기 푸시 (기본값)
    Run,

    /// 리더보드를 한 번 렌더링해 표준 출력으로 출력
    Print {
        /// 순위 기준 지표 (volume, pnl, roi)
        #[arg(long, default_value = "pnl")]
        metric: Metric,

        /// 대회 종료 결과 형식으로 출력
        #[arg(long = "final")]
        final_results: bool,
    },

    /// PnL 리더보드를 대상 채팅에 한 번 전송
    Push,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 로깅 초기화
    let default_filter = format!(
        "leaderboard_bot={0},leaderboard_core={0},leaderboard_data={0},leaderboard_notification={0}",
        cli.log_level
    );
    init_logging(LogConfig::new(default_filter).with_env_format())
        .map_err(|e| BotError::Logging(e.to_string()))?;

    // 설정 로드 및 검증
    let config = BotConfig::from_env()?;
    info!(
        subgraph_url = %config.subgraph_url,
        from = config.window.from,
        to = ?config.window.to,
        "설정 로드 완료"
    );

    let source = SubgraphClient::new(config.subgraph_config())?;
    let ctx = Arc::new(AppContext::new(Arc::new(source), config.window));

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(ctx, &config).await?,
        Commands::Print {
            metric,
            final_results,
        } => {
            let message = if final_results {
                ctx.render_final().await?
            } else {
                ctx.render(metric, metric.default_label()).await?
            };
            println!("{message}");
        }
        Commands::Push => {
            let telegram = config.require_telegram()?;
            let sender = TelegramSender::new(&telegram);
            push_once(&ctx, &sender).await?;
        }
    }

    Ok(())
}

/// 봇 폴링과 정기 푸시를 실행하고 종료 신호를 기다립니다.
async fn run_bot(ctx: Arc<AppContext>, config: &BotConfig) -> leaderboard_bot::Result<()> {
    let telegram = config.require_telegram()?;
    let shutdown = CancellationToken::new();

    let sender: Arc<dyn NotificationSender> = Arc::new(TelegramSender::new(&telegram));
    let push = ScheduledPush::start(Arc::clone(&ctx), sender, &config.schedule, &shutdown);

    tokio::spawn(shutdown_signal(shutdown.clone()));

    info!("리더보드 봇 실행 중");
    let bot = TelegramBotHandler::new(&telegram, ctx);
    bot.start_polling(shutdown.clone()).await;

    push.shutdown().await;
    info!("리더보드 봇 종료");

    Ok(())
}

/// Ctrl+C 또는 SIGTERM을 받으면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Ctrl+C 핸들러 설치 실패: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("SIGTERM 핸들러 설치 실패: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down..."),
        _ = terminate => warn!("Received SIGTERM, shutting down..."),
    }

    shutdown.cancel();
}
