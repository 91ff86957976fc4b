//! Wire messages between the sensor bridge and the kiosk.
//!
//! Two families arrive on the same socket, distinguished by their tag
//! field: interpreted gestures (tagged `gesture`) and raw telemetry
//! (tagged `type`). Field casing follows the bridge's JSON exactly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanVector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomVector {
    pub delta: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboVector {
    pub x: f64,
    pub y: f64,
    pub delta: i64,
}

/// An interpreted gesture from the sensor bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum GestureMessage {
    Pan { vector: PanVector },
    Zoom { vector: ZoomVector },
    Combo { vector: ComboVector },
}

/// Raw rotary-encoder readings, forwarded for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinPacket {
    #[serde(rename = "sensorID")]
    pub sensor_id: String,
    #[serde(rename = "encoderIndex")]
    pub encoder_index: u32,
    #[serde(rename = "encoderDelta")]
    pub encoder_delta: i64,
    #[serde(rename = "encoderElapsedTime")]
    pub encoder_elapsed_time: f64,
    #[serde(rename = "encoderPosition")]
    pub encoder_position: i64,
}

/// Raw accelerometer readings, forwarded for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiltPacket {
    #[serde(rename = "sensorID")]
    pub sensor_id: String,
    #[serde(rename = "tiltX")]
    pub tilt_x: f64,
    #[serde(rename = "tiltY")]
    pub tilt_y: f64,
    #[serde(rename = "tiltMagnitude")]
    pub tilt_magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryMessage {
    Spin { packet: SpinPacket },
    Tilt { packet: TiltPacket },
}

/// One decoded inbound frame.
///
/// Frames that parse as neither family are surfaced as `Unknown` rather
/// than dropped, so a misconfigured bridge is visible at the kiosk.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Gesture(GestureMessage),
    Telemetry(TelemetryMessage),
    Unknown(String),
}

pub fn decode(raw: &str) -> Inbound {
    if let Ok(gesture) = serde_json::from_str::<GestureMessage>(raw) {
        return Inbound::Gesture(gesture);
    }
    if let Ok(telemetry) = serde_json::from_str::<TelemetryMessage>(raw) {
        return Inbound::Telemetry(telemetry);
    }
    Inbound::Unknown(raw.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{decode, GestureMessage, Inbound, TelemetryMessage};

    #[test]
    fn decodes_the_three_gesture_shapes() {
        let pan = decode(r#"{"gesture":"pan","vector":{"x":0.1,"y":-0.2}}"#);
        let Inbound::Gesture(GestureMessage::Pan { vector }) = pan else {
            panic!("expected pan, got {pan:?}");
        };
        assert_eq!(vector.x, 0.1);
        assert_eq!(vector.y, -0.2);

        let zoom = decode(r#"{"gesture":"zoom","vector":{"delta":-3}}"#);
        let Inbound::Gesture(GestureMessage::Zoom { vector }) = zoom else {
            panic!("expected zoom, got {zoom:?}");
        };
        assert_eq!(vector.delta, -3);

        let combo = decode(r#"{"gesture":"combo","vector":{"x":0.5,"y":0.0,"delta":12}}"#);
        assert!(matches!(combo, Inbound::Gesture(GestureMessage::Combo { .. })));
    }

    #[test]
    fn decodes_telemetry_with_bridge_field_casing() {
        let raw = r#"{
            "type": "spin",
            "packet": {
                "sensorID": "encoder-1",
                "encoderIndex": 0,
                "encoderDelta": 4,
                "encoderElapsedTime": 16.4,
                "encoderPosition": 412
            }
        }"#;
        let Inbound::Telemetry(TelemetryMessage::Spin { packet }) = decode(raw) else {
            panic!("expected spin telemetry");
        };
        assert_eq!(packet.sensor_id, "encoder-1");
        assert_eq!(packet.encoder_position, 412);

        let raw = r#"{
            "type": "tilt",
            "packet": {
                "sensorID": "imu-1",
                "tiltX": 0.02,
                "tiltY": -0.01,
                "tiltMagnitude": 0.022
            }
        }"#;
        assert!(matches!(
            decode(raw),
            Inbound::Telemetry(TelemetryMessage::Tilt { .. })
        ));
    }

    #[test]
    fn unrecognized_frames_are_kept_verbatim() {
        let raw = r#"{"gesture":"wave","amplitude":2}"#;
        assert_eq!(decode(raw), Inbound::Unknown(raw.to_string()));
        assert_eq!(decode("not json"), Inbound::Unknown("not json".to_string()));
    }
}
