//! Example: Load and display form definitions from the form-definitions directory.

use optout_form::{FormLoader, FormRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Try to load from the default directory (form-definitions/)
    println!("Loading form definitions from form-definitions/...\n");

    let loader = match FormLoader::with_default_dir() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("\nMake sure you're running this from the workspace root!");
            return Err(Box::new(e));
        }
    };

    let definitions = loader.load_all()?;

    println!(
        "✓ Successfully loaded {} form definitions:\n",
        definitions.len()
    );

    for def in &definitions {
        println!("  • {} ({})", def.name(), def.id());
        println!("    URL: {}", def.form.url);
        println!("    Audience: {:?}", def.form.audience);
        println!("    Region: {:?}", def.form.region);
        println!("    Fields: {}", def.fields.len());
        println!("    Sub-options: {}", def.sub_options.len());
        if !def.required_columns.is_empty() {
            println!("    Required columns: {:?}", def.required_columns);
        }
        println!();
    }

    let registry = FormRegistry::load_from(&loader)?;
    println!("✓ Registry populated with {} definitions\n", registry.count());

    Ok(())
}
