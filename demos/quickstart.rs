use civtime::{
    Disambiguation, Duration, DurationFields, Instant, PlainDate, PlainDateTime, PlainTime,
    TemporalError, TimeZone,
};

fn add_business_days(start: PlainDate, business_days: u32) -> Result<PlainDate, TemporalError> {
    let mut current = start;
    let mut added = 0;
    while added < business_days {
        current = current.checked_add(&Duration::from_days(1))?;
        if current.day_of_week() <= 5 {
            added += 1;
        }
    }
    Ok(current)
}

fn main() -> Result<(), TemporalError> {
    let date = PlainDate::new(2023, 6, 15)?;
    println!("Date: {date} (weekday {}, day {})", date.day_of_week(), date.day_of_year());
    println!("  + 7 days:  {}", date.checked_add(&Duration::from_days(7))?);
    println!("  - 14 days: {}", date.checked_sub(&Duration::from_days(14))?);

    let time = PlainTime::new(14, 30, 45, 123_456)?;
    let step = Duration::from_fields(DurationFields {
        hours: 2,
        minutes: 15,
        ..Default::default()
    })?;
    println!("Time: {time}, + 2h15m: {}", time + step);
    println!("Parsed time: {}", "09:15:30.500".parse::<PlainTime>()?);

    let dt = PlainDateTime::new(2023, 6, 15, 14, 30, 45, 123_456)?;
    let step: Duration = "P1DT3H30M".parse()?;
    println!("DateTime: {dt} ({} / {})", dt.to_plain_date(), dt.to_plain_time());
    println!("  + {step}: {}", dt.checked_add(&step)?);

    let d1: Duration = "P1DT2H30M45S".parse()?;
    let d2 = Duration::from_minutes(75);
    println!("Duration: {d1} = {} s", d1.total_seconds());
    println!("  {d1} + {d2} = {}", d1.checked_add(&d2)?);
    println!("  {d1} - {d2} = {}", d1.checked_sub(&d2)?);

    let utc = TimeZone::utc();
    let zdt = PlainDateTime::new(2023, 6, 15, 14, 30, 45, 0)?
        .to_zoned_date_time(utc.clone(), Disambiguation::Compatible)?;
    println!("Zoned: {zdt} (offset {})", zdt.offset_string());
    match TimeZone::named("America/New_York") {
        Ok(eastern) => println!("  in {}: {}", eastern.id(), zdt.with_timezone(eastern.clone())),
        Err(err) => println!("  {err}"),
    }
    println!("  + 6 hours: {}", zdt.checked_add(&Duration::from_hours(6))?);

    let now = Instant::now();
    println!("Now: {now} ({} ms since epoch)", now.epoch_milliseconds());
    println!("  + 1 hour: {}", now.checked_add(&Duration::from_hours(1))?);
    println!("  in UTC:   {}", now.to_zoned_date_time(utc));
    println!("From epoch: {}", Instant::from_epoch_seconds(1_687_438_245.0)?);

    for bad in [
        PlainDate::new(2023, 13, 45).map(|d| d.to_string()),
        "25:00:00".parse::<PlainTime>().map(|t| t.to_string()),
        "invalid".parse::<Duration>().map(|d| d.to_string()),
    ] {
        if let Err(err) = bad {
            println!("Rejected ({}): {err}", err.kind());
        }
    }

    let end = add_business_days(date, 5)?;
    println!("5 business days after {date}: {end} (weekday {})", end.day_of_week());
    Ok(())
}
