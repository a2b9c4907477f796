use anyhow::Result;
use scrub_engine::Registries;

pub fn handle() -> Result<()> {
    let registries = Registries::with_defaults()?;

    print_family("Readers", registries.readers.list_available());
    print_family("Preprocessors", registries.preprocessors.list_available());
    print_family("Postprocessors", registries.postprocessors.list_available());
    print_family("Writers", registries.writers.list_available());

    Ok(())
}

fn print_family(title: &str, names: Vec<String>) {
    println!("{}:", title);
    for name in names {
        println!("  {}", name);
    }
}
