use biostrap_client::{
    BiostrapClient, RawDataRequest, config::Config, http_client::ReqwestBiostrapClient,
};
use chrono::Utc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let target_email = match args.next() {
        Some(email) => email,
        None => {
            eprintln!("usage: request_raw_export <target_email> <user_id>...");
            return Ok(());
        }
    };
    let user_ids: Vec<String> = args.collect();
    if user_ids.is_empty() {
        eprintln!("usage: request_raw_export <target_email> <user_id>...");
        return Ok(());
    }
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestBiostrapClient::from_config(&cfg)?;

    let end = Utc::now();
    let request = RawDataRequest {
        target_email,
        start_time: end - chrono::Duration::days(1),
        end_time: end,
        user_ids,
        data_to_download: vec!["biometrics".into()],
        output_file_formats: vec!["csv".into()],
        anonymize_ids: false,
    };
    let resp = client.download_raw_data(&request).await?;
    println!("export requested: {}", resp);

    if let Some(job_id) = resp["data"]["job_id"].as_str() {
        let job = client.get_job_status(job_id).await?;
        println!("job {} is {}", job.job_id, job.latest_status);
    }
    Ok(())
}
