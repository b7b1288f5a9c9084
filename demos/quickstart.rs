use chrono::Utc;
use tracing_subscriber::EnvFilter;
use utctime::{Instant, TimeError, Version};

fn main() -> Result<(), TimeError> {
    // `RUST_LOG=utctime=trace` shows cache recomputation and rejected input.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("utctime=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let now = Instant::from_utc(Utc::now())?;
    let tomorrow = &now + 86_400.0;

    println!("utctime {}", Version::current());
    println!("now:      {now} ({} s)", now.epoch());
    println!("tomorrow: {tomorrow} (day {} of the year)", tomorrow.day_of_year());

    let mut t: Instant = "2012-05-07T15:13:58.000100".parse()?;
    if let Err(err) = t.set_month_and_day(2, 30) {
        println!("rejected: {err}");
    }
    t.set_day_of_year(366)?;
    println!("leap year end: {t}");
    Ok(())
}
