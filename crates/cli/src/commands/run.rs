//! `craftmind run` — Interactive sandbox session.
//!
//! Your typed lines become inbound chat from a named player, dispatched
//! against the in-memory simulated world. A reachable Ollama endpoint does
//! the reasoning; everything the bot says or does is echoed back here.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use craftmind_actions::builtin_registry;
use craftmind_agent::{Dispatcher, Session};
use craftmind_config::AppConfig;
use craftmind_core::event::EventBus;
use craftmind_core::identity::BotIdentity;
use craftmind_core::turn::Role;
use craftmind_core::world::{ChatEvent, Position};
use craftmind_reasoner::OllamaReasoner;
use craftmind_world::SimWorld;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(config_path: &Path, player: String) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path).context("Failed to load config")?;
    let bot_name = config.bot.name.clone();

    let world = Arc::new(SimWorld::new(&bot_name));
    // Seed the speaking player into the world so lookups can find them.
    world
        .place_player(&player, Position::new(10.0, 64.0, -3.0))
        .await;

    let registry = Arc::new(builtin_registry(world.clone()));
    let reasoner = Arc::new(OllamaReasoner::new(
        &config.reasoner.base_url,
        &config.reasoner.model,
        config.reasoner.temperature,
    ));

    let mut identity = BotIdentity::new(&bot_name);
    if let Some(prompt) = &config.bot.system_prompt {
        identity = identity.with_system_prompt(prompt.clone());
    }

    let mut dispatcher = Dispatcher::new(
        reasoner,
        registry,
        Session::new(identity),
        Arc::new(EventBus::default()),
    )
    .with_max_rounds(config.agent.max_rounds);

    println!();
    println!("  Craftmind sandbox — \"{bot_name}\" is listening");
    println!("  Model:    {} @ {}", config.reasoner.model, config.reasoner.base_url);
    println!("  You speak as \"{player}\", standing at (10, 64, -3).");
    println!("  Type a message and press Enter. 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_prompt(&player)?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            print_prompt(&player)?;
            continue;
        }
        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        let seen_turns = dispatcher.transcript().len();
        let seen_chat = world.outbox().await.len();

        dispatcher
            .handle_chat(ChatEvent {
                username: player.clone(),
                message: line,
            })
            .await;

        // Echo what the bot thought out loud and what it said in chat.
        for turn in &dispatcher.transcript()[seen_turns..] {
            if turn.role == Role::Agent && !turn.content.is_empty() {
                println!("  [{bot_name} thinks] {}", turn.content);
            }
        }
        for said in &world.outbox().await[seen_chat..] {
            println!("  {bot_name} > {said}");
        }
        let position = world.bot_position().await;
        println!("  ({bot_name} is at {position})");
        println!();

        print_prompt(&player)?;
    }

    Ok(())
}

fn print_prompt(player: &str) -> anyhow::Result<()> {
    use std::io::Write;
    print!("  {player} > ");
    std::io::stdout().flush()?;
    Ok(())
}
