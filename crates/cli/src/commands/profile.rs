//! Profile and avatar commands.

use tandem_client::ProfileManager;
use tandem_core::AvatarOptions;

use super::{connect, note_cached};
use crate::AvatarArgs;

/// Show the signed-in profile.
#[allow(clippy::print_stdout)]
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;

    let fetched = client.fetch_profile().await?;
    note_cached(&fetched);

    let user = &fetched.value;
    println!("Email:        {}", user.email);
    println!(
        "Display name: {}",
        user.display_name.as_deref().unwrap_or("(not set)"),
    );
    match &user.couple_code {
        Some(code) => println!("Couple code:  {code}"),
        None => println!("Couple code:  (not linked)"),
    }
    println!("Member since: {}", user.created_at.format("%Y-%m-%d"));
    Ok(())
}

/// Change the display name.
#[allow(clippy::print_stdout)]
pub async fn set_name(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    let manager = ProfileManager::new(client);

    let user = manager.set_display_name(name).await?;
    println!(
        "Display name set to {}.",
        user.display_name.as_deref().unwrap_or(name),
    );
    Ok(())
}

/// Show the avatar, or update the dimensions given as flags.
#[allow(clippy::print_stdout)]
pub async fn avatar(args: AvatarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    let manager = ProfileManager::new(client);

    let mut options = manager.avatar_options().await?;
    if !apply(&args, &mut options) {
        print_options(&options);
        return Ok(());
    }

    manager.save_avatar_options(&options).await?;
    println!("Avatar saved.");
    print_options(&options);
    Ok(())
}

/// Overlay the flags onto `options`. Returns whether anything changed.
fn apply(args: &AvatarArgs, options: &mut AvatarOptions) -> bool {
    let mut changed = false;
    let mut set = |slot: &mut String, value: &Option<String>| {
        if let Some(token) = value {
            slot.clone_from(token);
            changed = true;
        }
    };

    set(&mut options.top_type, &args.top);
    set(&mut options.accessories_type, &args.accessories);
    set(&mut options.hair_color, &args.hair_color);
    set(&mut options.facial_hair_type, &args.facial_hair);
    set(&mut options.facial_hair_color, &args.facial_hair_color);
    set(&mut options.clothe_type, &args.clothes);
    set(&mut options.clothe_color, &args.clothes_color);
    set(&mut options.eye_type, &args.eyes);
    set(&mut options.eyebrow_type, &args.eyebrows);
    set(&mut options.mouth_type, &args.mouth);
    set(&mut options.skin_color, &args.skin);
    changed
}

#[allow(clippy::print_stdout)]
fn print_options(options: &AvatarOptions) {
    println!("top:               {}", options.top_type);
    println!("accessories:       {}", options.accessories_type);
    println!("hair color:        {}", options.hair_color);
    println!("facial hair:       {}", options.facial_hair_type);
    println!("facial hair color: {}", options.facial_hair_color);
    println!("clothes:           {}", options.clothe_type);
    println!("clothes color:     {}", options.clothe_color);
    println!("eyes:              {}", options.eye_type);
    println!("eyebrows:          {}", options.eyebrow_type);
    println!("mouth:             {}", options.mouth_type);
    println!("skin:              {}", options.skin_color);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn no_flags() -> AvatarArgs {
        AvatarArgs {
            top: None,
            accessories: None,
            hair_color: None,
            facial_hair: None,
            facial_hair_color: None,
            clothes: None,
            clothes_color: None,
            eyes: None,
            eyebrows: None,
            mouth: None,
            skin: None,
        }
    }

    #[test]
    fn test_no_flags_changes_nothing() {
        let mut options = AvatarOptions::default();
        assert!(!apply(&no_flags(), &mut options));
        assert_eq!(options, AvatarOptions::default());
    }

    #[test]
    fn test_flags_overlay_only_their_dimension() {
        let args = AvatarArgs {
            top: Some("WinterHat1".to_owned()),
            ..no_flags()
        };
        let mut options = AvatarOptions::default();

        assert!(apply(&args, &mut options));
        assert_eq!(options.top_type, "WinterHat1");
        assert_eq!(options.skin_color, AvatarOptions::default().skin_color);
    }
}
