//! nb-init: create or update NetBox objects from YAML initializer files

use anyhow::Result;

fn main() -> Result<()> {
    nb_init::cli::run()
}
