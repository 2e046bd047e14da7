//! Stream a camera's live feed to stdout
//!
//! Run with: cargo run --example ws_to_stdout HOST USER PASS [VENC] [SUBSTREAM]
//!
//! Pipe the output into any player that reads fragmented MP4 from stdin:
//!
//!   cargo run --example ws_to_stdout 192.168.1.20 admin instar h264hp | ffplay -
//!
//! Set `INSECURE=1` to connect with `ws://` instead of `wss://`, and
//! `NOAUDIO=1` if the camera streams video only. Logs go to stderr;
//! control verbosity with `RUST_LOG` (e.g. `RUST_LOG=ws_player_rs=debug`).
//!
//! The repository's `examples/` directory holds unrelated reference code, so
//! demos live in `demos/` and are registered with `[[example]]` entries in
//! Cargo.toml; `cargo run --example` works as usual.

use std::env;

use tracing_subscriber::EnvFilter;
use ws_player_rs::{Player, PlayerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: ws_to_stdout HOST USER PASS [VENC] [SUBSTREAM]");
        std::process::exit(2);
    }

    let mut config = PlayerConfig::new(&args[0])
        .credentials(&args[1], &args[2])
        .insecure(env::var_os("INSECURE").is_some())
        .reconnect(true);
    if let Some(venc) = args.get(3) {
        config = config.venc(venc);
    }
    if let Some(substream) = args.get(4) {
        config = config.substream(substream);
    }
    if env::var_os("NOAUDIO").is_some() {
        config = config.no_audio();
    }

    let (mut player, handle) = Player::connect(config, tokio::io::stdout())?;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Stopping stream...");
            handle.stop();
            handle.shutdown();
        }
    });

    player.run().await;
    player.close().await;

    let stats = player.controller_stats();
    eprintln!(
        "Done: {} fragments, {} bytes, max queue depth {}, {} keep-alives",
        stats.fragments_received, stats.bytes_received, stats.max_queue_depth, stats.keep_alives_sent
    );
    Ok(())
}
