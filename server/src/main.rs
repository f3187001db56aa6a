use karaqueue_server::config::Config;

#[rocket::launch]
fn rocket() -> _ {
    // rocket's own logger is skipped once this one is installed
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("[+] starting karaqueue server");

    karaqueue_server::build(config)
}
