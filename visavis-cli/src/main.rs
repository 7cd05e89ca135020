use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use dialoguer::Input;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use visavis_client::{
    CallClient, ClientConfig, ClientNotice, DeniedDevices, MediaDevices, MediaSink, NoticeLevel,
    SignalingConfig, SyntheticDevices, TransportConfig,
};
use visavis_core::{IceServerConfig, RoomId};

#[derive(Parser)]
#[command(name = "visavis")]
#[command(about = "Two-party audio/video call client")]
struct Cli {
    /// Signaling relay endpoint.
    #[arg(long, default_value = "wss://signal.visavis.dev/ws")]
    server: String,

    /// STUN/TURN server URL.
    #[arg(long, default_value = "stun:stun.l.google.com:19302")]
    stun: String,

    /// Simulate a denied camera/microphone permission prompt.
    #[arg(long)]
    deny_media: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("visavis=info")),
        )
        .init();

    let config = ClientConfig {
        signaling: SignalingConfig {
            endpoint: cli.server.clone(),
            ..Default::default()
        },
        transport: TransportConfig {
            ice_servers: vec![IceServerConfig {
                urls: vec![cli.stun.clone()],
                username: None,
                credential: None,
            }],
        },
    };

    let devices: Arc<dyn MediaDevices> = if cli.deny_media {
        Arc::new(DeniedDevices)
    } else {
        Arc::new(SyntheticDevices)
    };

    println!("{}", "visavis".bold());
    println!("Connecting to {}...", cli.server.cyan());

    let (client, notices) = CallClient::connect(config, devices)
        .await
        .context("Could not reach the signaling relay")?;

    let camera_ready = Arc::new(AtomicBool::new(true));
    let printer = spawn_notice_printer(notices, camera_ready.clone());

    println!("Commands: join <room> | leave | call | hangup | status | quit");

    let mut room: Option<RoomId> = None;
    loop {
        let line = read_line().await?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "join" => {
                let id = RoomId::from(words.collect::<Vec<_>>().join(" "));
                match client.join_room(&id) {
                    Ok(()) => room = Some(id),
                    Err(e) => println!("{} {e}", "error:".red().bold()),
                }
            }
            "leave" => match &room {
                Some(id) => {
                    if let Err(e) = client.leave_room(id).await {
                        println!("{} {e}", "error:".red().bold());
                    }
                    room = None;
                }
                None => println!("{} not in a room", "warn:".yellow()),
            },
            "call" => {
                if camera_ready.load(Ordering::Relaxed) {
                    client.start_call().await;
                } else {
                    println!("Unable to access the camera.");
                }
            }
            "hangup" => client.hang_up().await,
            "status" => print_status(&client, &room, &camera_ready).await,
            "quit" | "exit" => break,
            other => println!("{} unknown command '{other}'", "warn:".yellow()),
        }
    }

    client.close().await;
    printer.abort();
    println!("Bye.");
    Ok(())
}

/// dialoguer prompts are blocking; keep them off the runtime threads.
async fn read_line() -> Result<String> {
    tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("visavis")
            .allow_empty(true)
            .interact_text()
    })
    .await
    .context("Input task failed")?
    .context("Failed to read input")
}

fn spawn_notice_printer(
    mut notices: mpsc::UnboundedReceiver<ClientNotice>,
    camera_ready: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            if matches!(notice, ClientNotice::CameraUnavailable(_)) {
                camera_ready.store(false, Ordering::Relaxed);
            }
            match notice.level() {
                NoticeLevel::Info => println!("{} {notice}", "info:".cyan()),
                NoticeLevel::Warn => println!("{} {notice}", "warn:".yellow()),
                NoticeLevel::Error => println!("{} {notice}", "error:".red().bold()),
            }
        }
    })
}

async fn print_status(client: &CallClient, room: &Option<RoomId>, camera_ready: &AtomicBool) {
    match room {
        Some(id) => println!("room:   {id}"),
        None => println!("room:   -"),
    }
    if camera_ready.load(Ordering::Relaxed) {
        println!("camera: available");
    } else {
        println!("camera: {}", "Unable to access the camera.".red());
    }
    println!("call:   {:?}", client.call_state());
    print_sink(client.local_sink()).await;
    print_sink(client.remote_sink()).await;
}

async fn print_sink(sink: &Arc<MediaSink>) {
    let bound = match sink.stream_id().await {
        Some(stream) => format!("{} ({} packets)", stream, sink.packets_received()),
        None => "unbound".to_owned(),
    };
    let muted = if sink.is_muted() { " [muted]" } else { "" };
    println!("{:>6}: {bound}{muted}", sink.label());
}
