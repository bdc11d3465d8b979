use c4_backend::keygen::generate_api_key;

fn main() -> anyhow::Result<()> {
    let key = generate_api_key()?;
    println!("Generated API key: {key}");
    Ok(())
}
