use clap::Parser;
use client::game::Game;
use log::info;
use rand::Rng;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:5555")]
    server: String,

    /// Display name; a random one is generated when omitted
    #[arg(short = 'n', long)]
    name: Option<String>,
}

fn window_conf() -> macroquad::window::Conf {
    macroquad::window::Conf {
        window_title: "Cuboid World".to_string(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let name = args
        .name
        .unwrap_or_else(|| format!("Player{}", rand::thread_rng().gen_range(1000..10000)));
    if name.trim().is_empty() {
        eprintln!("Display name cannot be empty");
        return;
    }

    info!("Starting client as {}", name);
    info!("Controls: WASD to move, Space to jump, mouse to orbit, wheel to zoom");

    Game::new(args.server, name).run().await;
}
