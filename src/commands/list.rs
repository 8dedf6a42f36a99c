#[derive(clap::Parser, Debug)]
pub struct ListCommand {
    /// Print the full device descriptions as JSON
    #[arg(long)]
    json: bool,
}

impl ListCommand {
    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        let client = args.api_args.api_client()?;
        let devices = client.list_devices().await?;
        client.close();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&devices)?);
            return Ok(());
        }

        for d in devices {
            println!(
                "{sku:<7} {id} {name} {kind}",
                sku = d.sku,
                id = d.device,
                name = d.device_name,
                kind = d
                    .device_type
                    .map(|t| format!("{t:?}"))
                    .unwrap_or_default(),
            );
        }
        Ok(())
    }
}
