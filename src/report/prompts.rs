use dialoguer::Input;

use crate::error::Result;
use crate::scoring::weights::Preference;

/// Ask for a dining preference. Returns the raw answer, possibly empty; the
/// caller decides how to treat unrecognized input.
pub fn prompt_preference() -> Result<String> {
    println!();
    println!("Enter your dining preference:");
    for pref in Preference::ALL {
        println!("  - {}: {}", pref.name(), pref.description());
    }

    let input: String = Input::new()
        .with_prompt("Your preference (healthy/variety/balanced)")
        .allow_empty(true)
        .interact_text()?;

    Ok(input.trim().to_lowercase())
}
