use biostrap_client::{BiostrapClient, config::Config, http_client::ReqwestBiostrapClient};
use chrono::Utc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let user_id = match std::env::args().nth(1) {
        Some(id) => id,
        None => {
            eprintln!("usage: daily_scores <user_id>");
            return Ok(());
        }
    };
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestBiostrapClient::from_config(&cfg)?;

    let today = Utc::now().date_naive();
    let scores = client.get_user_scores(today, &user_id).await?;
    println!(
        "{}: activity {} / recovery {} / sleep {}",
        today, scores.activity.value, scores.recovery.value, scores.sleep.value
    );

    let since = Utc::now() - chrono::Duration::hours(24);
    let samples = client.get_user_biometrics(since, 1, &user_id).await?;
    if let Some(sample) = samples.first() {
        println!(
            "latest sample at {}: {} bpm, spo2 {}",
            sample.timestamp, sample.bpm, sample.spo2
        );
    }
    Ok(())
}
