use rskdm::{DcpCreator, KdmGenerator};

fn main() -> anyhow::Result<()> {
    match DcpCreator::new(None) {
        Ok(creator) => println!("dcpomatic2_cli: {}", creator.version()?),
        Err(err) => println!("DCP creator not available: {}", err),
    }

    match KdmGenerator::new(None) {
        Ok(generator) => println!("dcpomatic2_kdm_cli: {}", generator.version()?),
        Err(err) => println!("KDM generator not available: {}", err),
    }

    Ok(())
}
