// src/cli/chat.rs — Interactive assistant REPL

use crate::api::ApiClient;
use crate::assistant::voice::{spawn_playback, CommandRecorder, Recorder};
use crate::assistant::{Conversation, Role};
use crate::infra::config::Config;
use crate::infra::errors::PulsedeckError;

/// Run the assistant REPL. `/record` captures a voice question; Enter on an
/// active recording stops it.
pub async fn run_chat(api: ApiClient, config: &Config) -> anyhow::Result<()> {
    {
        let session = api.session();
        let authenticated = session
            .lock()
            .expect("session lock poisoned")
            .is_authenticated();
        if !authenticated {
            eprintln!("Not signed in. Run `pulsedeck login`.");
            return Ok(());
        }
    }

    let mut conversation = Conversation::new(api);
    if let Some(greeting) = conversation.messages().first() {
        println!("assistant: {}\n", greeting.text);
    }
    println!("Type a question, /record for voice, /quit to leave.\n");

    while let Some(input) = read_input() {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "/quit" || trimmed == "quit" || trimmed == "exit" {
            break;
        }

        let result = if trimmed == "/record" {
            record_and_submit(&mut conversation, config).await
        } else {
            conversation.submit(trimmed).await
        };

        match result {
            Ok(()) => {
                if let Some(reply) = conversation
                    .messages()
                    .iter()
                    .rev()
                    .find(|m| matches!(m.role, Role::Assistant))
                {
                    println!("assistant: {}\n", reply.text);
                    if let Some(audio) = &reply.audio {
                        spawn_playback(audio.clone(), &config.voice);
                    }
                }
            }
            Err(PulsedeckError::Unauthorized) => {
                eprintln!("Session expired. Run `pulsedeck login`.");
                break;
            }
            Err(e) => eprintln!("{e}\n"),
        }
    }

    Ok(())
}

async fn record_and_submit(
    conversation: &mut Conversation,
    config: &Config,
) -> Result<(), PulsedeckError> {
    let recorder = CommandRecorder::detect(&config.voice)?;
    let max = recorder.max_duration();
    let recording = recorder.start().await?;
    println!("Recording... press Enter to stop ({}s max)", max.as_secs());

    // Stop on Enter or when the cap elapses, whichever comes first. Either
    // path goes through stop(), which releases the microphone.
    let wait_for_enter = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    });
    let _ = tokio::time::timeout(max, wait_for_enter).await;

    let clip = recording.stop().await?;
    println!("Transcribing...");
    conversation.submit_audio(clip).await?;
    Ok(())
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
