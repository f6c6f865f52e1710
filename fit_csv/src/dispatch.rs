use kinematics::IntegratorState;

use crate::{Message, Payload, Row};

/// Builds the rows of one recording.
///
/// Owns the integration carry for that recording only. Start a new
/// dispatcher for every file.
#[derive(Debug, Default)]
pub struct Dispatcher {
    state: IntegratorState,
    rows: Vec<Row>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, Message { payload, magnetometer }: &Message) {
        match payload {
            Payload::AccelBurst(burst) => {
                let (samples, state) = kinematics::integrate(burst, self.state);
                self.rows.extend(samples.into_iter().map(Row::from));
                self.state = state;
            }
            Payload::HeartRate { timestamp, bpm } => {
                self.rows.push(Row::heart_rate(*timestamp, *bpm));
            }
            Payload::GpsFix {
                timestamp,
                lat,
                lon,
            } => {
                self.rows.push(Row::gps(*timestamp, *lat, *lon));
            }
            Payload::Unrecognized => {}
        }

        if let Some(reading) = magnetometer {
            self.rows.push(Row::magnetometer(reading));
        }
    }

    pub const fn state(&self) -> IntegratorState {
        self.state
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn finish(self) -> Vec<Row> {
        self.rows
    }
}

/// Rows for one recording, in message order.
pub fn dispatch(messages: impl IntoIterator<Item = Message>) -> Vec<Row> {
    let mut dispatcher = Dispatcher::new();

    for message in messages {
        dispatcher.push(&message);
    }

    dispatcher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    use kinematics::Burst;
    use time::{Duration, PrimitiveDateTime, macros::datetime};

    use crate::{MagReading, RowKind};

    const T: PrimitiveDateTime = datetime!(2024-01-01 10:00:00);

    fn burst(timestamp: PrimitiveDateTime, x: Vec<f64>) -> Message {
        let len = x.len();
        Message {
            payload: Payload::AccelBurst(
                Burst::new(timestamp, x, vec![0.0; len], vec![0.0; len]).expect("equal lengths"),
            ),
            magnetometer: None,
        }
    }

    fn heart_rate(bpm: u8) -> Message {
        Message {
            payload: Payload::HeartRate {
                timestamp: T,
                bpm: Some(bpm),
            },
            magnetometer: None,
        }
    }

    fn kinds(rows: &[Row]) -> Vec<RowKind> {
        rows.iter().map(|this| this.kind).collect()
    }

    #[test]
    fn unrecognized_produces_nothing() {
        let rows = dispatch([Message::unrecognized(), Message::unrecognized()]);

        assert!(rows.is_empty());
    }

    #[test]
    fn burst_rows_are_contiguous() {
        let rows = dispatch([
            heart_rate(80),
            burst(T, vec![1.0, 2.0, 3.0]),
            heart_rate(81),
        ]);

        assert_eq!(
            vec![
                RowKind::HeartRate,
                RowKind::Acceleration,
                RowKind::Acceleration,
                RowKind::Acceleration,
                RowKind::HeartRate,
            ],
            kinds(&rows)
        );
        assert_eq!(
            vec![Some(1.0), Some(2.0), Some(3.0)],
            rows[1..4].iter().map(|this| this.accel_x).collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_burst() {
        let mut dispatcher = Dispatcher::new();

        dispatcher.push(&burst(T, vec![]));

        assert!(dispatcher.rows().is_empty());
        assert_eq!(IntegratorState::default(), dispatcher.state());
    }

    #[test]
    fn carry_continues_across_bursts() {
        let rows = dispatch([
            burst(T, vec![100.0, 200.0]),
            heart_rate(90),
            burst(T + Duration::SECOND, vec![50.0]),
        ]);

        let last_of_first = &rows[1];
        let first_of_second = &rows[3];

        let seed = kinematics::AxisState {
            velocity: last_of_first.vel_x.unwrap_or_default(),
            displacement: last_of_first.dis_x.unwrap_or_default(),
        };
        let expected = seed.step(50.0);

        assert_eq!(Some(expected.velocity), first_of_second.vel_x);
        assert_eq!(Some(expected.displacement), first_of_second.dis_x);
    }

    #[test]
    fn each_file_starts_from_rest() {
        let file = || {
            vec![
                burst(T, vec![100.0, 200.0]),
                burst(T + Duration::SECOND, vec![50.0]),
            ]
        };

        let first = dispatch(file());
        let second = dispatch(file());

        assert_eq!(first, second);
        assert_eq!(Some(0.0), first[0].dis_x);
    }

    #[test]
    fn heart_rate_and_magnetometer() {
        let message = Message {
            payload: Payload::HeartRate {
                timestamp: T,
                bpm: Some(72),
            },
            magnetometer: Some(MagReading {
                timestamp: T,
                x: vec![10.0],
                y: vec![20.0],
                z: vec![30.0],
            }),
        };

        let rows = dispatch([message]);

        assert_eq!(vec![RowKind::HeartRate, RowKind::Magnetometer], kinds(&rows));
        assert_eq!(rows[0].timestamp, rows[1].timestamp);
        assert_eq!(Some(72), rows[0].heart_rate);
        assert_eq!(None, rows[1].heart_rate);
    }

    #[test]
    fn burst_and_magnetometer() {
        let mut message = burst(T, vec![1.0, 2.0]);
        message.magnetometer = Some(MagReading {
            timestamp: T,
            x: vec![1.0],
            y: vec![1.0],
            z: vec![1.0],
        });

        let rows = dispatch([message]);

        assert_eq!(
            vec![
                RowKind::Acceleration,
                RowKind::Acceleration,
                RowKind::Magnetometer
            ],
            kinds(&rows)
        );
    }

    #[test]
    fn gps_row() {
        let rows = dispatch([Message {
            payload: Payload::GpsFix {
                timestamp: T,
                lat: Some(45.0),
                lon: Some(9.0),
            },
            magnetometer: None,
        }]);

        assert_eq!(vec![Row::gps(T, Some(45.0), Some(9.0))], rows);
    }
}
