//! Engine settings commands

use anyhow::Result;
use apura_core::db::Database;

pub fn cmd_tax_rate(db: &Database, rate: Option<f64>) -> Result<()> {
    match rate {
        Some(rate) => {
            db.set_tax_rate(rate)?;
            println!("✅ Tax rate set to {:.1}%", rate);
            println!("   Applied to gross revenue on the DRE taxes line.");
        }
        None => {
            let current = db.tax_rate()?;
            println!("Tax rate: {:.1}%", current);
        }
    }

    Ok(())
}
