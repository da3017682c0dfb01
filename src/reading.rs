/// Sensor family member, which decides how the payload bytes are scaled.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    /// Whole-number humidity and temperature in bytes 0 and 2.
    Dht11,
    /// Tenths of a unit in 16-bit words, temperature sign in bit 15.
    Dht22,
}

/// The four data bytes of a checksum-valid frame, packed first byte highest.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedReading(u32);

impl DecodedReading {
    /// Wraps a packed payload.
    pub fn new(raw: u32) -> Self {
        DecodedReading(raw)
    }

    /// The packed payload, humidity bytes in the upper half.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// `[hum_hi, hum_lo, temp_hi, temp_lo]`.
    pub fn bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Converts the payload into physical units for the given model.
    pub fn to_reading(self, model: Model) -> Reading {
        let [hum_hi, hum_lo, temp_hi, temp_lo] = self.bytes();

        match model {
            Model::Dht11 => Reading {
                temperature: temp_hi as f32,
                relative_humidity: hum_hi as f32,
            },
            Model::Dht22 => {
                let joined_humidity = u16::from_be_bytes([hum_hi, hum_lo]);
                let relative_humidity = joined_humidity as f32 / 10.0;

                let is_temp_negative = (temp_hi >> 7) != 0;
                let temp_hi = temp_hi & 0b0111_1111;
                let joined_temp = u16::from_be_bytes([temp_hi, temp_lo]);
                let mut temperature = joined_temp as f32 / 10.0;
                if is_temp_negative {
                    temperature = -temperature;
                }

                Reading {
                    temperature,
                    relative_humidity,
                }
            }
        }
    }
}

impl From<DecodedReading> for u32 {
    fn from(reading: DecodedReading) -> Self {
        reading.0
    }
}

/// Reading in physical units.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_order() {
        let reading = DecodedReading::new(0x0102_0304);
        assert_eq!(reading.bytes(), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(u32::from(reading), 0x0102_0304);
    }

    #[test]
    fn test_dht11_reading() {
        // 45%RH, 23.0C; DHT11 decimal bytes are ignored
        let reading = DecodedReading::new(u32::from_be_bytes([45, 0, 23, 4]));

        assert_eq!(
            reading.to_reading(Model::Dht11),
            Reading {
                relative_humidity: 45.0,
                temperature: 23.0,
            }
        );
    }

    #[test]
    fn test_dht22_positive_temp() {
        // Humidity: 55.5% -> [0x02, 0x2B] => 555
        // Temperature: 24.6C -> [0x00, 0xF6] => 246
        let reading = DecodedReading::new(u32::from_be_bytes([0x02, 0x2B, 0x00, 0xF6]));

        assert_eq!(
            reading.to_reading(Model::Dht22),
            Reading {
                relative_humidity: 55.5,
                temperature: 24.6,
            }
        );
    }

    #[test]
    fn test_dht22_negative_temp() {
        // Temperature: -1.0C -> [0x80, 0x0A], sign in bit 7 of temp_hi
        let reading = DecodedReading::new(u32::from_be_bytes([0x01, 0x90, 0x80, 0x0A]));

        assert_eq!(
            reading.to_reading(Model::Dht22),
            Reading {
                relative_humidity: 40.0,
                temperature: -1.0,
            }
        );
    }
}
