use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use launcher_rs::button::{PulsedOutput, SystemClock};
use launcher_rs::servo::{PulseWidthServo, RotationalDriver, ServoVariant, SteppedServo};
use launcher_rs::{angles, config, Imu, LauncherRig, LinearActuator, Sensitivity};

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting head-tracking launcher controller...");

    // The angle pipeline divides by the envelope; refuse to start misconfigured.
    angles::validate_envelope(config::MAX_ANGLE_DEGREES)?;
    for warning in angles::envelope_warnings(config::MAX_ANGLE_DEGREES) {
        println!("⚠ {}", warning);
    }

    let variant = if std::env::args().any(|arg| arg == "--stepped") {
        ServoVariant::Stepped
    } else {
        ServoVariant::PulseWidth
    };

    let mut imu = Imu::new()?;

    if let Ok(status) = imu.calibration_status() {
        println!(
            "  IMU self-calibration: sys {}/3  gyro {}/3  accel {}/3  mag {}/3",
            status.system, status.gyro, status.accel, status.mag
        );
    }

    println!("\nHold the headset in the neutral pose, then press Enter to calibrate...");
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    imu.calibrate()?;
    let (theta_offset, phi_offset) = imu.offsets();
    println!(
        "✓ Calibrated. Offsets: theta {:.1}°, phi {:.1}°",
        theta_offset, phi_offset
    );

    let linear = LinearActuator::new()?;
    let rotational: Box<dyn RotationalDriver> = match variant {
        ServoVariant::PulseWidth => Box::new(PulseWidthServo::new()?),
        ServoVariant::Stepped => Box::new(SteppedServo::new()?),
    };
    println!("✓ Actuators ready (rotational variant: {})", rotational.describe());

    let hold = Duration::from_millis(config::BUTTON_HOLD_MS);
    let mut trigger = PulsedOutput::new(config::TRIGGER_RELAY_PIN, hold)?;
    let mut speed_button = PulsedOutput::new(config::SPEED_BUTTON_PIN, hold)?;

    // Shared operator state: the stdin thread is the single writer, the
    // control loop reads a snapshot each tick.
    let sensitivity = Arc::new(Mutex::new(Sensitivity::Fine));
    let recalibrate = Arc::new(AtomicBool::new(false));
    let fire = Arc::new(AtomicBool::new(false));
    let toggle_speed = Arc::new(AtomicBool::new(false));

    {
        let sensitivity = Arc::clone(&sensitivity);
        let recalibrate = Arc::clone(&recalibrate);
        let fire = Arc::clone(&fire);
        let toggle_speed = Arc::clone(&toggle_speed);

        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let Some(key) = line.trim().chars().next() else {
                    continue;
                };
                if let Some(mode) = Sensitivity::from_key(key) {
                    *sensitivity.lock().unwrap_or_else(PoisonError::into_inner) = mode;
                    println!("→ Sensitivity: {}", mode);
                } else {
                    match key.to_ascii_uppercase() {
                        'C' => recalibrate.store(true, Ordering::SeqCst),
                        'F' => fire.store(true, Ordering::SeqCst),
                        'S' => toggle_speed.store(true, Ordering::SeqCst),
                        _ => {} // any other input is a no-op
                    }
                }
            }
        });
    }

    println!("\nControl loop started.");
    println!("  H = coarse sensitivity   L = fine sensitivity");
    println!("  c = recalibrate          f = fire   s = flywheel speed\n");

    let mut rig = LauncherRig::new(imu, linear, rotational, Arc::clone(&sensitivity));
    let clock = SystemClock;
    let mut last_status_update = Instant::now();

    loop {
        if recalibrate.swap(false, Ordering::SeqCst) {
            rig.calibrate()?;
            let (theta_offset, phi_offset) = rig.offsets();
            println!(
                "✓ Recalibrated. Offsets: theta {:.1}°, phi {:.1}°",
                theta_offset, phi_offset
            );
        }
        if fire.swap(false, Ordering::SeqCst) {
            trigger.press(&clock);
            println!("→ Fire!");
        }
        if toggle_speed.swap(false, Ordering::SeqCst) {
            speed_button.press(&clock);
            println!("→ Flywheel speed button pressed");
        }
        trigger.update(&clock);
        speed_button.update(&clock);

        if let Some(report) = rig.tick(&clock)?
            && last_status_update.elapsed()
                >= Duration::from_secs(config::STATUS_UPDATE_INTERVAL_SECS)
        {
            println!("\n[Status Update]");
            println!("  Theta: {:>6.1}°   Phi: {:>6.1}°", report.theta, report.phi);
            println!("  Sensitivity: {}", report.sensitivity);
            println!("  Linear: {:?}", report.linear);
            println!("  Actuator pot: {} (raw ADC)", report.position_reading);
            io::stdout().flush().ok();
            last_status_update = Instant::now();
        }

        thread::sleep(Duration::from_millis(config::TICK_INTERVAL_MS));
    }
}
