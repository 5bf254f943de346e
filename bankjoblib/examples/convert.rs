use bankjoblib::{
    formats::{json::Json, ofx::Ofx},
    traits::{ReadFormat, WriteFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: выписка скрейпера в JSON -> OFX (stdin -> stdout)
    let mut st = Json::read(std::io::BufReader::new(std::io::stdin()))?;
    st.finish(true, true)?;
    Ofx::write(std::io::stdout(), &st)?;
    Ok(())
}
