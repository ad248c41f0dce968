use emotion_curve::{CurveCommand, CurveConfig, EmotionCurve, Label, HOURS};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CurveConfig::builder()
        .title("Random mood walk".to_string())
        .show_control_points(false)
        .build();

    let mut curve = EmotionCurve::new(config);

    let (sender, receiver) = mpsc::channel();

    // Random walk of the whole day, with an occasional label and offset drift
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut amplitudes = [0.0f64; HOURS];
        let mut tick = 0u64;
        loop {
            for value in amplitudes.iter_mut() {
                *value = (*value + rng.random_range(-0.3f64..0.3)).clamp(-3.0, 3.0);
            }
            let mut commands = vec![CurveCommand::SetAmplitudes(amplitudes)];
            if tick % 20 == 0 {
                let hour = rng.random_range(0..HOURS);
                commands.push(CurveCommand::SetLabel(
                    hour,
                    Label::new("Event", format!("tick {tick}")),
                ));
                commands.push(CurveCommand::SetOffset(rng.random_range(-1.0f64..1.0)));
            }

            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }

            tick += 1;
            thread::sleep(Duration::from_millis(100));
        }
    });

    println!("Displaying a randomly wandering emotion curve");
    println!("Press Escape to exit");

    curve.show_with_commands(receiver)?;
    Ok(())
}
