use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = pick_api::Args::parse();

	pick_api::run(args).await
}
