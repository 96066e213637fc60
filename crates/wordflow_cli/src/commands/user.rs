use anyhow::Result;

use crate::app::App;
use crate::commands::print_json;
use crate::OutputFormat;

pub fn run_add(app: &App, email: &str, format: &OutputFormat) -> Result<()> {
    let user = app.users()?.register(email, app.now())?;
    let claimed = app.terms()?.claim_legacy_terms(user.uuid)?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "id": user.uuid,
            "email": user.email,
            "claimedTerms": claimed,
        }))?,
        OutputFormat::Plain => {
            println!("Registered {} ({})", user.email, user.uuid);
            if claimed > 0 {
                println!("Claimed {claimed} existing terms.");
            }
        }
    }
    Ok(())
}
