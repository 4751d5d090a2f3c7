//! Headless Angry Tanks client
//!
//! Connects to an in-process scripted server over the loopback transport,
//! drives the local tank with canned input for a number of fixed-step frames,
//! and prints what happened.

use std::path::PathBuf;

use angry_tanks::prelude::*;
use angry_tanks::session::ClientPacket;
use clap::Parser;
use tank_engine::config::Config;
use tank_engine::foundation::logging;
use tank_engine::foundation::math::Vec2;
use tank_engine::foundation::time::Timer;

#[derive(Parser, Debug)]
#[command(name = "angry_tanks", version, about = "Headless Angry Tanks client")]
struct Args {
    /// Configuration file (.toml or .ron)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map file (.ron) served to the client
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// More logging; repeat for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Plays the server side of a session from a fixed script
struct ScriptedServer {
    endpoint: LoopbackServer,
    map: Vec<u8>,
    local: Option<(String, TeamType)>,
    shots_seen: u32,
    updates_seen: u32,
}

impl ScriptedServer {
    const LOCAL_SLOT: u8 = 0;
    const BOT_SLOT: u8 = 1;

    fn new(endpoint: LoopbackServer, map: &MapDescription) -> Result<Self, WorldError> {
        Ok(Self {
            endpoint,
            map: map.to_ron()?.into_bytes(),
            local: None,
            shots_seen: 0,
            updates_seen: 0,
        })
    }

    /// Answer everything the client sent since the last frame
    fn respond(&mut self, frame: u32) -> Result<(), SessionError> {
        for packet in self.endpoint.drain() {
            match packet {
                ClientPacket::Connect { host, port, hail } => {
                    if let Ok(Message::Enter { callsign, team, .. }) = Message::decode(&hail) {
                        log::info!("[server] {callsign} ({team}) connecting to {host}:{port}");
                        self.endpoint.accept()?;
                        self.local = Some((callsign, team));
                    }
                }
                ClientPacket::Disconnect { reason } => log::info!("[server] client left: {reason}"),
                ClientPacket::Data { payload, .. } => match Message::decode(&payload) {
                    Ok(Message::World { .. }) => self.send_state()?,
                    Ok(Message::ShotBegin { shot_slot, .. }) => {
                        self.shots_seen += 1;
                        log::debug!("[server] shot {shot_slot} fired");
                    }
                    Ok(Message::PlayerClientUpdate { .. }) => self.updates_seen += 1,
                    Ok(other) => log::debug!("[server] ignoring {:?}", other.message_type()),
                    Err(error) => log::warn!("[server] bad packet: {error}"),
                },
            }
        }

        // Halfway through, the bot scores on the local tank and it respawns
        if frame == 300 {
            self.endpoint.send_message(&Message::Death {
                slot: Self::LOCAL_SLOT,
                killer: Self::BOT_SLOT,
            })?;
            self.endpoint.send_message(&Message::Score {
                slot: Self::BOT_SLOT,
                score: Score { wins: 1, losses: 0 },
            })?;
        } else if frame == 330 {
            self.spawn_local(Vec2::new(-250.0, 250.0))?;
        }
        Ok(())
    }

    fn send_state(&self) -> Result<(), SessionError> {
        let (callsign, team) = self.local.clone().unwrap_or_else(|| ("You".to_string(), TeamType::Rogue));
        self.endpoint.send_message(&Message::World { raw: self.map.clone() })?;
        self.endpoint.send_message(&Message::AddPlayer {
            player: PlayerInformation {
                slot: Self::BOT_SLOT,
                callsign: "Bot".to_string(),
                tag: "scripted".to_string(),
                team: TeamType::Red,
            },
            add_myself: false,
        })?;
        self.endpoint.send_message(&Message::AddPlayer {
            player: PlayerInformation {
                slot: Self::LOCAL_SLOT,
                callsign,
                tag: String::new(),
                team,
            },
            add_myself: true,
        })?;
        self.endpoint.send_message(&Message::State)?;
        self.endpoint.send_message(&Message::Spawn {
            slot: Self::BOT_SLOT,
            position: Vec2::new(250.0, -250.0),
            rotation: 0.0,
        })?;
        self.spawn_local(Vec2::new(0.0, 250.0))
    }

    fn spawn_local(&self, position: Vec2) -> Result<(), SessionError> {
        self.endpoint.send_message(&Message::Spawn {
            slot: Self::LOCAL_SLOT,
            position,
            rotation: 0.0,
        })
    }
}

/// Canned driving: forward, turn, fire, reverse, repeat
fn scripted_controls(frame: u32) -> TankControls {
    match frame % 240 {
        0..=89 => TankControls::FORWARD,
        90..=119 => TankControls::RIGHT,
        120..=124 => TankControls::FORWARD | TankControls::FIRE,
        125..=199 => TankControls::REVERSE | TankControls::LEFT,
        _ => TankControls::empty(),
    }
}

struct HeadlessApp {
    client: GameClient<LoopbackTransport>,
    server: ScriptedServer,
    client_config: ClientConfig,
    timer: Timer,
}

impl HeadlessApp {
    fn new(config: &GameConfig, map: &MapDescription) -> Result<Self, Box<dyn std::error::Error>> {
        let mut variables = VariableDatabase::new();
        config.apply_variables(&mut variables)?;

        let (transport, endpoint) = loopback();
        Ok(Self {
            client: GameClient::new(transport, variables, config.simulation.grid_size)?,
            server: ScriptedServer::new(endpoint, map)?,
            client_config: config.client.clone(),
            timer: Timer::with_frame_rate(config.simulation.frame_rate),
        })
    }

    fn run(&mut self, frames: u32) -> Result<(), Box<dyn std::error::Error>> {
        self.client.connect(&self.client_config)?;

        for frame in 0..frames {
            self.server.respond(frame)?;
            let time = self.timer.tick();
            self.client.update(&time, scripted_controls(frame))?;
        }

        self.print_summary();
        self.client.disconnect("simulation finished");
        self.server.respond(frames)?;
        Ok(())
    }

    fn print_summary(&self) {
        println!("Simulated {} frames ({:.1} s)", self.timer.frame_count(), self.timer.current().total_seconds());
        println!("Shots fired: {}", self.server.shots_seen);
        println!("Position updates sent: {}", self.server.updates_seen);
        println!("Link status: {}", self.client.status());
        println!("Map: '{}' with {} objects", self.client.world().name(), self.client.world().len());

        for player in self.client.players().players() {
            let position = player.sprite().position();
            println!(
                "  [{}] {} ({}) {:?} at ({:.1}, {:.1}), score {}",
                player.slot(),
                player.callsign(),
                player.team(),
                player.state(),
                position.x,
                position.y,
                player.score().total()
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;

    let level = match args.verbose {
        0 => config.engine.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    logging::init_with_level(level)?;
    log::info!("Starting Angry Tanks headless client");

    let map = match &args.map {
        Some(path) => MapDescription::from_ron(&std::fs::read(path)?)?,
        None => MapDescription::test_arena(),
    };

    let mut app = HeadlessApp::new(&config, &map)?;
    if let Err(error) = app.run(args.frames) {
        log::error!("Session failed: {error}");
        return Err(error);
    }

    Ok(())
}
