// `devbuilder quantity` — check a resource quantity string.

use clap::Args;
use serde::Serialize;

use crate::commands::block_on;
use crate::config::CliConfig;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct QuantityArgs {
    /// Quantity string to check, e.g. `1Gi` or `500m`.
    quantity: String,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantityResult {
    pub quantity: String,
    pub valid: bool,
}

pub fn run(args: QuantityArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_quantity(args.quantity)) {
        Ok(result) => {
            let valid = result.valid;
            output::print_output(format, &result, format_human)?;
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            output::print_anyhow_error(format, &e);
            Err(e)
        }
    }
}

async fn call_quantity(quantity: String) -> anyhow::Result<QuantityResult> {
    // An empty quantity means "unset", which is always acceptable.
    if quantity.is_empty() {
        return Ok(QuantityResult { quantity, valid: true });
    }
    let client = CliConfig::load().client()?;
    let valid = client.quantity_valid(&quantity).await?;
    Ok(QuantityResult { quantity, valid })
}

fn format_human(result: &QuantityResult) -> String {
    if result.valid {
        format!("{} is a valid quantity", result.quantity)
    } else {
        format!("{} is not a valid quantity", result.quantity)
    }
}
