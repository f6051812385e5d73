//! Timed sample → convert → encode → transmit cycle.
//!
//! The sampler owns the timing gate and the sensor model; the caller supplies the
//! monotonic clock reading, the ADC and the serial writer, so the same code runs on
//! the board and in host tests.

use embedded_io_async::Write;

use crate::config::SAMPLE_INTERVAL_MS;
use crate::drivers::hall::{AnalogSource, SensorModel};
use crate::sample::{EncodeError, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum SamplerState {
    Waiting,
    Sampling,
}

#[derive(Debug)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum TransmitError<E> {
    Encode(EncodeError),
    Io(E),
}

impl<E> From<EncodeError> for TransmitError<E> {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

/// Encode `sample` and write it out as a single line.
pub async fn transmit<W: Write>(
    writer: &mut W,
    sample: &Sample,
) -> Result<(), TransmitError<W::Error>> {
    let line = sample.encode_line()?;
    writer.write_all(&line).await.map_err(TransmitError::Io)
}

#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    model: SensorModel,
    interval_ms: u64,
    last_sample_ms: u64,
}

impl Sampler {
    pub const fn new(model: SensorModel, interval_ms: u64) -> Self {
        Self {
            model,
            interval_ms,
            last_sample_ms: 0,
        }
    }

    pub fn model(&self) -> &SensorModel {
        &self.model
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_sample_ms(&self) -> u64 {
        self.last_sample_ms
    }

    pub fn state(&self, now_ms: u64) -> SamplerState {
        if now_ms.saturating_sub(self.last_sample_ms) >= self.interval_ms {
            SamplerState::Sampling
        } else {
            SamplerState::Waiting
        }
    }

    /// Pure conversion of one raw reading taken at `now_ms`.
    pub fn cycle(&self, raw: u16, now_ms: u64) -> Sample {
        Sample::new(now_ms, self.model.convert(raw).amps)
    }

    /// Take a reading if the interval has elapsed. The source is left untouched otherwise.
    pub fn poll<A: AnalogSource>(&mut self, now_ms: u64, source: &mut A) -> Option<Sample> {
        if self.state(now_ms) == SamplerState::Waiting {
            return None;
        }

        let sample = self.cycle(source.read_raw(), now_ms);
        self.last_sample_ms = now_ms;
        Some(sample)
    }

    /// One polling step: sample if due and push the line out. The cycle counts as done
    /// even when the write fails, so a dead link does not turn into a retry burst.
    pub async fn step<A: AnalogSource, W: Write>(
        &mut self,
        now_ms: u64,
        source: &mut A,
        writer: &mut W,
    ) -> Result<Option<Sample>, TransmitError<W::Error>> {
        match self.poll(now_ms, source) {
            Some(sample) => {
                transmit(writer, &sample).await?;
                Ok(Some(sample))
            }
            None => Ok(None),
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(SensorModel::DATASHEET, SAMPLE_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_io_async::ErrorType;

    /// Serial stand-in collecting everything written to it.
    #[derive(Default)]
    struct Capture {
        bytes: std::vec::Vec<u8>,
    }

    impl ErrorType for Capture {
        type Error = Infallible;
    }

    impl Write for Capture {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }
    }

    impl Capture {
        fn lines(&self) -> std::vec::Vec<&str> {
            core::str::from_utf8(&self.bytes)
                .unwrap()
                .split_terminator("\r\n")
                .collect()
        }
    }

    #[derive(Debug)]
    struct LinkDown;

    impl embedded_io_async::Error for LinkDown {
        fn kind(&self) -> embedded_io_async::ErrorKind {
            embedded_io_async::ErrorKind::BrokenPipe
        }
    }

    struct DeadLink;

    impl ErrorType for DeadLink {
        type Error = LinkDown;
    }

    impl Write for DeadLink {
        async fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
            Err(LinkDown)
        }
    }

    #[test]
    fn waits_for_first_interval_after_boot() {
        let mut sampler = Sampler::default();
        let mut reads = 0;
        let mut adc = || {
            reads += 1;
            512
        };

        for now in 0..SAMPLE_INTERVAL_MS {
            assert_eq!(sampler.state(now), SamplerState::Waiting);
            assert!(sampler.poll(now, &mut adc).is_none());
        }
        assert!(sampler.poll(SAMPLE_INTERVAL_MS, &mut adc).is_some());
        assert_eq!(reads, 1);
    }

    #[test]
    fn transmitted_samples_respect_interval() {
        let mut sampler = Sampler::default();
        let mut adc = || 700u16;
        let mut out = Capture::default();
        let mut sent_at = std::vec::Vec::new();

        // Irregular loop timing, including repeated clock readings
        let mut now = 0u64;
        for jitter in [0u64, 1, 0, 3, 2, 7, 1, 0, 4, 9].iter().cycle().take(500) {
            now += jitter;
            if let Some(sample) = block_on(sampler.step(now, &mut adc, &mut out)).unwrap() {
                sent_at.push(now);
                assert_eq!(sample.time, now as f64 / 1000.0);
            }
        }

        assert!(sent_at.len() > 10);
        for pair in sent_at.windows(2) {
            assert!(pair[1] - pair[0] >= SAMPLE_INTERVAL_MS, "{:?}", pair);
        }
        assert_eq!(out.lines().len(), sent_at.len());
    }

    #[test]
    fn every_line_is_a_two_field_json_object() {
        let mut sampler = Sampler::default();
        let mut raw = 0u16;
        let mut adc = || {
            raw = (raw + 97) % 1024;
            raw
        };
        let mut out = Capture::default();

        for now in (0..200).map(|i| i * SAMPLE_INTERVAL_MS) {
            block_on(sampler.step(now, &mut adc, &mut out)).unwrap();
        }

        let lines = out.lines();
        assert_eq!(lines.len(), 199);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            let map = value.as_object().unwrap();
            assert_eq!(map.len(), 2, "{line}");
            assert!(map["time"].is_number());
            assert!(map["current"].is_number());
        }
    }

    #[test]
    fn cycle_is_pure() {
        let sampler = Sampler::default();
        let a = sampler.cycle(512, 40);
        let b = sampler.cycle(512, 40);
        assert_eq!(a, b);

        let mut stateful = Sampler::default();
        let mut adc = || 512u16;
        let first = stateful.poll(40, &mut adc).unwrap();
        let second = stateful.poll(80, &mut adc).unwrap();
        assert_eq!(first.current, second.current);
        assert_eq!(first.current, a.current);
    }

    #[test]
    fn backwards_clock_keeps_waiting() {
        let mut sampler = Sampler::default();
        let mut adc = || 0u16;
        assert!(sampler.poll(100, &mut adc).is_some());
        assert_eq!(sampler.state(50), SamplerState::Waiting);
        assert!(sampler.poll(50, &mut adc).is_none());
        assert_eq!(sampler.last_sample_ms(), 100);
    }

    #[test]
    fn encode_failures_surface_as_transmit_errors() {
        let err: TransmitError<Infallible> = EncodeError::BufferFull.into();
        assert!(matches!(err, TransmitError::Encode(EncodeError::BufferFull)));
    }

    #[test]
    fn failed_write_still_completes_the_cycle() {
        let mut sampler = Sampler::default();
        let mut adc = || 1023u16;
        let mut link = DeadLink;

        let res = block_on(sampler.step(10, &mut adc, &mut link));
        assert!(matches!(res, Err(TransmitError::Io(LinkDown))));
        assert_eq!(sampler.last_sample_ms(), 10);

        let res = block_on(sampler.step(12, &mut adc, &mut link));
        assert!(matches!(res, Ok(None)));
    }
}
