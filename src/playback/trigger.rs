use crate::config::ClipTable;
use crate::playback::controller::PlaybackController;

const DEVICE_KEY: &str = "deviceNum=";
const DEVICE_DIGITS: usize = 2;

/// Leading integer of `s`, 0 when there is none.
pub fn parse_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| (acc * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX) + 1));
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Device identifier carried by an event payload such as
/// `message=TESTOK|deviceNum=11|payload=...`.
pub fn device_from_payload(payload: &str) -> i32 {
    payload
        .find(DEVICE_KEY)
        .map(|at| {
            let rest = &payload[at + DEVICE_KEY.len()..];
            let end = rest
                .char_indices()
                .nth(DEVICE_DIGITS)
                .map_or(rest.len(), |(i, _)| i);
            parse_int(&rest[..end])
        })
        .unwrap_or(0)
}

/// Entry points that select a clip and raise the request.
#[derive(Debug)]
pub struct TriggerSurface {
    table: ClipTable,
}

impl TriggerSurface {
    pub fn new(table: ClipTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ClipTable {
        &self.table
    }

    pub fn play_clip(&self, controller: &mut PlaybackController, arg: &str) -> u16 {
        let clip = self.table.clamp_clip(parse_int(arg));
        tracing::info!(arg, clip, "clip requested");
        controller.submit(clip);
        clip
    }

    /// Unknown devices still raise the request so the failure is heard.
    pub fn trigger_device(&self, controller: &mut PlaybackController, device: i32) -> u16 {
        let clip = match self.table.lookup(device) {
            Some(clip) => {
                tracing::info!(device, clip, "device triggered");
                clip
            }
            None => {
                tracing::warn!(device, clip = self.table.error_clip, "unknown device");
                self.table.error_clip
            }
        };
        controller.submit(clip);
        clip
    }

    pub fn trigger(&self, controller: &mut PlaybackController, arg: &str) -> u16 {
        self.trigger_device(controller, parse_int(arg))
    }

    pub fn event(&self, controller: &mut PlaybackController, payload: &str) -> u16 {
        tracing::debug!(payload, "remote event");
        self.trigger_device(controller, device_from_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> (TriggerSurface, PlaybackController) {
        (
            TriggerSurface::new(ClipTable::default()),
            PlaybackController::new(0),
        )
    }

    #[test]
    fn parses_like_atoi() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("  7abc"), 7);
        assert_eq!(parse_int("-12"), -12);
        assert_eq!(parse_int("+3"), 3);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("-"), 0);
        assert_eq!(parse_int("99999999999"), i32::MAX);
        assert_eq!(parse_int("-99999999999"), i32::MIN);
    }

    #[test]
    fn payload_device_number() {
        assert_eq!(device_from_payload("message=TESTOK|deviceNum=11|payload=x"), 11);
        assert_eq!(device_from_payload("deviceNum=7|"), 7);
        assert_eq!(device_from_payload("deviceNum=123"), 12);
        assert_eq!(device_from_payload("deviceNum=4"), 4);
        assert_eq!(device_from_payload("deviceNum="), 0);
        assert_eq!(device_from_payload("deviceNum=xy"), 0);
        assert_eq!(device_from_payload("message=TESTOK"), 0);
        assert_eq!(device_from_payload("deviceNum=é1"), 0);
    }

    #[test]
    fn direct_clip_is_clamped() {
        let (surface, mut ctl) = surface();
        assert_eq!(surface.play_clip(&mut ctl, "42"), 42);
        assert_eq!(ctl.request().clip, 42);
        assert!(ctl.request().pending);
        assert_eq!(surface.play_clip(&mut ctl, "0"), 1);
        assert_eq!(surface.play_clip(&mut ctl, "900"), 2);
        assert_eq!(surface.play_clip(&mut ctl, "junk"), 1);
    }

    #[test]
    fn device_lookup_and_fallback() {
        let (surface, mut ctl) = surface();
        let table = surface.table().clone();
        for device in -5..40 {
            let clip = surface.trigger(&mut ctl, &device.to_string());
            let index = device - table.device_base;
            let expected = if (0..table.clips.len() as i32).contains(&index) {
                table.clips[index as usize]
            } else {
                table.error_clip
            };
            assert_eq!(clip, expected, "device {device}");
            assert_eq!(ctl.request().clip, expected);
            assert!(ctl.request().pending);
        }
    }

    #[test]
    fn event_matches_direct_trigger() {
        let (surface, mut ctl) = surface();
        let direct = surface.trigger(&mut ctl, "11");
        let event = surface.event(&mut ctl, "message=TESTOK|deviceNum=11|payload=...");
        assert_eq!(direct, event);
        assert_eq!(event, 11);
    }

    #[test]
    fn malformed_event_selects_error_clip() {
        let (surface, mut ctl) = surface();
        assert_eq!(surface.event(&mut ctl, "garbage"), surface.table().error_clip);
        assert!(ctl.request().pending);
    }
}
