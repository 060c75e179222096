use super::source::FetchError;

/// Number of DMX channels each simulated fixture occupies.
pub const CHANNELS_PER_FIXTURE: usize = 5;

/// A full frame of channel values for every fixture on the stage.
///
/// The length is always `num_lights * CHANNELS_PER_FIXTURE`. A buffer can only
/// be built from validated values or as a blackout, so the renderer never has
/// to bounds-check its reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelBuffer {
    values: Vec<u8>,
}

/// The five channel slots belonging to a single fixture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixtureChannels {
    pub slots: [u8; CHANNELS_PER_FIXTURE],
}

impl ChannelBuffer {
    /// All-zero buffer used whenever the data source can't be trusted.
    pub fn blackout(num_lights: usize) -> Self {
        Self {
            values: vec![0; num_lights * CHANNELS_PER_FIXTURE],
        }
    }

    /// Validate raw values from the data source.
    pub fn from_values(values: &[i64], num_lights: usize) -> Result<Self, FetchError> {
        let expected = num_lights * CHANNELS_PER_FIXTURE;
        if values.len() != expected {
            return Err(FetchError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        let values = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                u8::try_from(value).map_err(|_| FetchError::ValueOutOfRange { index, value })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Self { values })
    }

    pub fn num_lights(&self) -> usize {
        self.values.len() / CHANNELS_PER_FIXTURE
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    pub fn is_blackout(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }

    /// Channel slots `[i*5, i*5+5)` of fixture `index`.
    ///
    /// Panics if `index >= num_lights()`.
    pub fn fixture(&self, index: usize) -> FixtureChannels {
        let start = index * CHANNELS_PER_FIXTURE;
        let mut slots = [0u8; CHANNELS_PER_FIXTURE];
        slots.copy_from_slice(&self.values[start..start + CHANNELS_PER_FIXTURE]);
        FixtureChannels { slots }
    }
}

impl FixtureChannels {
    pub fn brightness(&self) -> u8 {
        self.slots[0]
    }

    pub fn saturation(&self) -> u8 {
        self.slots[4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blackout_has_expected_shape() {
        let buffer = ChannelBuffer::blackout(8);
        assert_eq!(buffer.len(), 40);
        assert_eq!(buffer.num_lights(), 8);
        assert!(buffer.is_blackout());
    }

    #[test]
    fn test_from_values_rejects_wrong_length() {
        let err = ChannelBuffer::from_values(&[0; 39], 8).unwrap_err();
        assert!(matches!(
            err,
            FetchError::ShapeMismatch {
                expected: 40,
                actual: 39
            }
        ));

        let err = ChannelBuffer::from_values(&[0; 41], 8).unwrap_err();
        assert!(matches!(err, FetchError::ShapeMismatch { actual: 41, .. }));
    }

    #[test]
    fn test_from_values_rejects_out_of_range() {
        let mut values = vec![0i64; 10];
        values[7] = 256;
        let err = ChannelBuffer::from_values(&values, 2).unwrap_err();
        assert!(matches!(
            err,
            FetchError::ValueOutOfRange {
                index: 7,
                value: 256
            }
        ));

        values[7] = -1;
        assert!(ChannelBuffer::from_values(&values, 2).is_err());
    }

    #[test]
    fn test_fixture_slices() {
        let values: Vec<i64> = (0..10).collect();
        let buffer = ChannelBuffer::from_values(&values, 2).unwrap();

        assert_eq!(buffer.fixture(0).slots, [0, 1, 2, 3, 4]);
        assert_eq!(buffer.fixture(1).slots, [5, 6, 7, 8, 9]);
        assert_eq!(buffer.fixture(1).brightness(), 5);
        assert_eq!(buffer.fixture(1).saturation(), 9);
        assert!(!buffer.is_blackout());
    }
}
