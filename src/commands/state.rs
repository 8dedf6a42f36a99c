use govee_api::{DeviceInfo, GoveeApiClient};

#[derive(clap::Parser, Debug)]
pub struct StateCommand {
    /// The device id to query. All devices are queried when omitted.
    id: Option<String>,

    /// Print the state as JSON
    #[arg(long)]
    json: bool,
}

impl StateCommand {
    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        let client = args.api_args.api_client()?;
        let result = self.show_states(&client).await;
        client.close();
        result
    }

    async fn show_states(&self, client: &GoveeApiClient) -> anyhow::Result<()> {
        let devices = match &self.id {
            Some(id) => vec![client.get_device_by_id(id).await?],
            None => client.list_devices().await?,
        };

        for device in &devices {
            match client.get_device_state(device).await {
                Ok(Some(state)) => self.print_state(device, &state)?,
                Ok(None) => log::warn!("{device}: no state reported"),
                Err(err) => log::error!("while getting state for {device}: {err:#}"),
            }
        }
        Ok(())
    }

    fn print_state(&self, device: &DeviceInfo, state: &DeviceInfo) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(state)?);
            return Ok(());
        }

        println!("Model: {}", device.sku);
        println!("Device: {}", device.device);
        println!("Name: {}", device.device_name);
        if let Some(kind) = device.device_type {
            println!("Type: {kind:?}");
        }
        for cap in &state.capabilities {
            println!(
                "  {kind:?} {instance}: {value}",
                kind = cap.kind,
                instance = cap.instance,
                value = cap
                    .value()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
        println!();
        Ok(())
    }
}
