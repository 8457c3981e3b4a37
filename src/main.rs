use hifitime::Epoch;
use log::{error, info};
use std::{fs, thread};
use sundial::{
    carto::projection::Canvas,
    cycle::{Frame, Pipeline},
    imaging::export::{save_night_mask, save_terminator_svg},
    shade::density::{HardwareSignals, SamplingDensity},
    time::Instant,
    vars::UPDATE_INTERVAL,
};

const MAP_WIDTH: f64 = 1440.0;
const MAP_HEIGHT: f64 = 720.0;
const OUTPUT: &str = "bounce";
const CPU_MAX_FREQ: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";

fn probe_hardware() -> HardwareSignals {
    let cores = thread::available_parallelism()
        .map(|cores| cores.get())
        .unwrap_or(1);
    let max_frequency_khz = fs::read_to_string(CPU_MAX_FREQ)
        .ok()
        .and_then(|text| text.trim().parse::<u64>().ok());
    HardwareSignals {
        performance_class: None,
        cores,
        max_frequency_khz,
    }
}

fn export(frame: &Frame) {
    let exports = [
        save_night_mask(frame, format!("{}/night-{}.tif", OUTPUT, MAP_WIDTH)),
        save_terminator_svg(frame, format!("{}/terminator-{}.svg", OUTPUT, MAP_WIDTH)),
    ];
    for export in exports {
        if let Err(err) = export {
            error!("export failed: {}", err);
        }
    }
}

fn main() {
    pretty_env_logger::init_timed();
    info!("initialising sundial");

    let signals = probe_hardware();
    let tier = signals.tier();
    let density = SamplingDensity::for_tier(tier, MAP_WIDTH);
    info!("{:?} tier device, sampling every {} px", tier, density.stride());

    if let Err(err) = fs::create_dir_all(OUTPUT) {
        error!("cannot create {}: {}", OUTPUT, err);
        return;
    }

    let mut pipeline = Pipeline::new(Canvas::new(MAP_WIDTH, MAP_HEIGHT), density);
    loop {
        // a failed clock read only costs one tick
        match Epoch::now() {
            Ok(epoch) => {
                let frame = pipeline.frame(&Instant::from(epoch));
                let (lon, lat) = frame.ephemeris.subsolar_point();
                info!("sun overhead at {:.2}° lon {:.2}° lat", lon, lat);
                export(&frame);
            }
            Err(err) => error!("cannot read the system clock: {}", err),
        }
        thread::sleep(UPDATE_INTERVAL);
    }
}
