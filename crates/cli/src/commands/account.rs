//! Account commands: register, login, logout.

use tandem_client::PairingResolver;
use tandem_core::NewUser;

use super::connect;
use crate::RegisterArgs;

/// Create a backend account.
#[allow(clippy::print_stdout)]
pub async fn register(args: RegisterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;

    let new_user = NewUser {
        email: args.email,
        password: args.password,
        display_name: args.name,
        couple_code: args.code,
    };
    let user = client.register(&new_user).await?;

    println!("Account created for {}.", user.email);
    if let Some(code) = &user.couple_code {
        println!("Linked to couple {code}.");
    }
    println!("Sign in with: tandem login -e {} -p <password>", user.email);
    Ok(())
}

/// Sign in, store the session, and pick up the account's couple code when
/// this device has none yet.
#[allow(clippy::print_stdout)]
pub async fn login(email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;

    let user = client.login(email, password).await?;
    let name = user.display_name.as_deref().unwrap_or(&user.email);
    println!("Logged in as {name}.");

    // A reinstalled device recovers its pairing from the account profile.
    if let Some(code) = &user.couple_code {
        let pairing = PairingResolver::new(client.store().clone());
        if pairing.active_code().await?.is_none() {
            pairing.join(code.as_str()).await?;
            println!("Restored couple pairing: {code}");
        }
    }
    Ok(())
}

/// Drop the stored session token and cached account.
#[allow(clippy::print_stdout)]
pub async fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    client.logout().await?;
    println!("Logged out.");
    Ok(())
}
