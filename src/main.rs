use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cfg = passkey_emu::config::Config::parse();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(passkey_emu::run(cfg))
}
