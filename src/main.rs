#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the hexmap application; file dialogs and exports are spawned onto
    // this tokio runtime
    hexmap_tool::run_app()
}
