use std::thread;
use std::time::Duration;

use launcher_rs::Imu;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║     Headset Zero-Offset Capture Tool                 ║");
    println!("╚══════════════════════════════════════════════════════╝\n");

    println!("Instructions:");
    println!("1. Put the headset on and face the launcher squarely");
    println!("2. Hold the neutral pose STILL while the offsets are captured");
    println!("3. Watch the calibrated angles settle near 0°");
    println!("4. Press Ctrl+C when done\n");

    let mut imu = Imu::new()?;

    if let Ok(status) = imu.calibration_status() {
        println!(
            "IMU self-calibration: sys {}/3  gyro {}/3  accel {}/3  mag {}/3",
            status.system, status.gyro, status.accel, status.mag
        );
        if status.system < 3 {
            println!("⚠ Fusion not fully calibrated yet; move the headset in a figure-eight first");
        }
    }

    println!("\nCapturing offsets in 5 seconds... HOLD STILL");
    thread::sleep(Duration::from_secs(5));

    imu.calibrate()?;
    let (theta_offset, phi_offset) = imu.offsets();
    println!(
        "✓ Offsets captured: theta {:.1}°, phi {:.1}°\n",
        theta_offset, phi_offset
    );

    println!("{:^8} | {:^12} | {:^12}", "Sample", "Theta", "Phi");
    println!("{:-<8}-+-{:-<12}-+-{:-<12}", "", "", "");

    let mut sample_count = 0;
    loop {
        if let Ok(reading) = imu.read_orientation() {
            sample_count += 1;
            if sample_count % 4 == 0 {
                println!(
                    "{:^8} | {:>9.1}°   | {:>9.1}°",
                    sample_count, reading.theta, reading.phi
                );
            }
        }

        thread::sleep(Duration::from_millis(100));
    }
}
