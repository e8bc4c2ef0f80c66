// src/cli/auth.rs — login / logout / whoami

use crate::api::ApiClient;
use crate::infra::errors::PulsedeckError;

/// Interactive sign-in. The session file is written only after both the
/// token exchange and the identity fetch succeed.
pub async fn login(api: &ApiClient, email: Option<String>) -> anyhow::Result<()> {
    let email = match email {
        Some(e) => e,
        None => match inquire::Text::new("Email address:").prompt_skippable()? {
            Some(e) if !e.trim().is_empty() => e.trim().to_string(),
            _ => {
                eprintln!("Cancelled.");
                return Ok(());
            }
        },
    };

    let password = match inquire::Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt_skippable()?
    {
        Some(p) if !p.is_empty() => p,
        _ => {
            eprintln!("Cancelled.");
            return Ok(());
        }
    };

    let token = match api.login(&email, &password).await {
        Ok(resp) => resp.access_token,
        Err(PulsedeckError::Unauthorized) => {
            eprintln!("Invalid email or password.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let profile = api.me_with_token(&token).await?;

    let session = api.session();
    let mut session = session.lock().expect("session lock poisoned");
    session.login(token, profile.clone())?;

    let name = profile.name.as_deref().unwrap_or(&profile.email);
    println!("Signed in as {} ({})", name, profile.email);
    Ok(())
}

pub fn logout(api: &ApiClient) -> anyhow::Result<()> {
    let session = api.session();
    let mut session = session.lock().expect("session lock poisoned");
    if !session.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    session.logout()?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(api: &ApiClient) -> anyhow::Result<()> {
    {
        let session = api.session();
        let session = session.lock().expect("session lock poisoned");
        if !session.is_authenticated() {
            println!("Not signed in. Run `pulsedeck login`.");
            return Ok(());
        }
    }

    match api.me().await {
        Ok(profile) => {
            let name = profile.name.as_deref().unwrap_or("(unnamed)");
            println!("{} <{}>", name, profile.email);
            if let Some(created) = profile.created_at {
                println!("  member since {}", created.format("%Y-%m-%d"));
            }
            Ok(())
        }
        Err(PulsedeckError::Unauthorized) => {
            println!("Session expired. Run `pulsedeck login`.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
