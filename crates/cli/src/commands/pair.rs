//! Pairing commands.
//!
//! `generate` and `join` only touch local state; the code reaches the
//! backend implicitly with the next scoped request. `status` additionally
//! asks the backend which code the signed-in account is linked to.

use tandem_client::PairingResolver;

use super::{connect, open_store};

/// Generate a fresh couple code and make it the active one.
#[allow(clippy::print_stdout)]
pub async fn generate() -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = open_store()?;
    let pairing = PairingResolver::new(store);

    let code = pairing.generate().await?;
    println!("Your couple code: {code}");
    println!("Share it with your partner so they can run: tandem pair join {code}");
    Ok(())
}

/// Join a couple with the code a partner shared.
#[allow(clippy::print_stdout)]
pub async fn join(input: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = open_store()?;
    let pairing = PairingResolver::new(store);

    let code = pairing.join(input).await?;
    println!("Paired as couple {code}");

    if let Some(destination) = pairing.take_pending_destination().await? {
        println!("You can now retry `tandem {destination}`.");
    }
    Ok(())
}

/// Show the locally active code and, when reachable, the server-linked one.
#[allow(clippy::print_stdout)]
pub async fn status() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    let pairing = PairingResolver::new(client.store().clone());

    let Some(code) = pairing.active_code().await? else {
        println!("Not paired. Run `tandem pair generate` or `tandem pair join <CODE>`.");
        return Ok(());
    };
    println!("Active couple code: {code}");

    match client.linked_code().await {
        Ok(link) => match link.code {
            Some(linked) if linked == code => println!("Server link:        confirmed"),
            Some(linked) => println!("Server link:        {linked} (differs from this device)"),
            None => println!("Server link:        none yet"),
        },
        Err(err) if err.is_network_unavailable() => {
            println!("Server link:        unknown (backend unreachable)");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Forget the locally stored couple code.
#[allow(clippy::print_stdout)]
pub async fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = open_store()?;
    let pairing = PairingResolver::new(store);

    pairing.clear().await?;
    println!("Couple code cleared from this device.");
    Ok(())
}
