//! Byte-level rendering of the frames an [`Http2Settings`] describes.
//!
//! Nothing here performs I/O. The output is what a client writes before its
//! first HEADERS frame: the connection preface, SETTINGS, the optional
//! connection WINDOW_UPDATE and the PRIORITY frames, in that order.
use bytes::{BufMut, Bytes, BytesMut};

use crate::http2::Http2Settings;
use crate::number::MAX_U31;
use crate::priority::PriorityParam;

/// The client connection preface.
pub const PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// Length of a frame header.
pub const FRAME_HEADER_LEN: usize = 9;

const PRIORITY: u8 = 0x2;
const SETTINGS: u8 = 0x4;
const WINDOW_UPDATE: u8 = 0x8;

const SETTING_LEN: usize = 6;
const PRIORITY_LEN: usize = 5;
const WINDOW_UPDATE_LEN: usize = 4;

// Largest payload the 24-bit length field can carry.
const MAX_PAYLOAD_LEN: usize = (1 << 24) - 1;

fn put_head<B: BufMut>(dst: &mut B, len: usize, kind: u8, flags: u8, stream_id: u32) {
    debug_assert!(
        len <= MAX_PAYLOAD_LEN,
        "frame payload of {len} bytes does not fit the length field"
    );
    // 24-bit length, type, flags, reserved bit + 31-bit stream id.
    dst.put_uint(len as u64, 3);
    dst.put_u8(kind);
    dst.put_u8(flags);
    dst.put_u32(stream_id & MAX_U31);
}

impl PriorityParam {
    /// Writes the 5-byte priority block used by PRIORITY frames and by
    /// HEADERS frames carrying the PRIORITY flag.
    pub fn write_to<B: BufMut>(&self, dst: &mut B) {
        let mut dependency = self.stream_dep & MAX_U31;
        if self.exclusive {
            dependency |= 1 << 31;
        }
        dst.put_u32(dependency);
        dst.put_u8(self.weight_byte());
    }
}

impl Http2Settings {
    /// The number of bytes [`encode_preface`](Self::encode_preface) writes.
    pub fn preface_len(&self) -> usize {
        let window = if self.connection_flow.is_some() {
            FRAME_HEADER_LEN + WINDOW_UPDATE_LEN
        } else {
            0
        };
        PREFACE.len()
            + FRAME_HEADER_LEN
            + self.settings.len() * SETTING_LEN
            + window
            + self.priority_frames.len() * (FRAME_HEADER_LEN + PRIORITY_LEN)
    }

    /// Appends the connection preface and the frames that follow it.
    ///
    /// All settings go into a single SETTINGS frame. Peers accept at most
    /// 16384 bytes of payload before they have announced a larger
    /// `MAX_FRAME_SIZE`, which is 2730 settings.
    ///
    /// ```
    /// use h2fingerprint::{Profile, PREFACE};
    ///
    /// let settings = Profile::Chrome117.settings().unwrap();
    /// let mut buf = bytes::BytesMut::new();
    /// settings.encode_preface(&mut buf);
    ///
    /// assert!(buf.starts_with(PREFACE));
    /// assert_eq!(buf.len(), settings.preface_len());
    /// ```
    pub fn encode_preface(&self, dst: &mut BytesMut) {
        dst.reserve(self.preface_len());
        dst.put_slice(PREFACE);

        put_head(dst, self.settings.len() * SETTING_LEN, SETTINGS, 0, 0);
        for setting in &self.settings {
            dst.put_u16(setting.id.0);
            dst.put_u32(setting.value);
        }

        if let Some(increment) = self.connection_flow {
            put_head(dst, WINDOW_UPDATE_LEN, WINDOW_UPDATE, 0, 0);
            dst.put_u32(increment & MAX_U31);
        }

        for frame in &self.priority_frames {
            put_head(dst, PRIORITY_LEN, PRIORITY, 0, frame.stream_id);
            frame.param.write_to(dst);
        }
    }

    /// Returns the connection preface and the frames that follow it.
    pub fn preface_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.preface_len());
        self.encode_preface(&mut buf);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::PriorityFrame;
    use crate::setting::{Setting, SettingId};

    #[test]
    fn empty_settings_still_send_a_settings_frame() {
        let bytes = Http2Settings::default().preface_bytes();
        assert_eq!(&bytes[..PREFACE.len()], PREFACE);
        assert_eq!(&bytes[PREFACE.len()..], &[0, 0, 0, SETTINGS, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn frames_follow_the_preface_in_order() {
        let settings = Http2Settings {
            settings: vec![
                Setting::new(SettingId::HEADER_TABLE_SIZE, 65536),
                Setting::new(SettingId::ENABLE_PUSH, 0),
            ],
            connection_flow: Some(15663105),
            header_priority: None,
            priority_frames: vec![PriorityFrame {
                stream_id: 3,
                param: PriorityParam {
                    stream_dep: 0,
                    exclusive: false,
                    weight: Some(200),
                },
            }],
            headers_pseudo_order: None,
        };

        let bytes = settings.preface_bytes();
        assert_eq!(bytes.len(), settings.preface_len());

        let frames = &bytes[PREFACE.len()..];
        #[rustfmt::skip]
        let expected: &[u8] = &[
            // SETTINGS
            0, 0, 12, SETTINGS, 0, 0, 0, 0, 0,
            0, 1, 0, 1, 0, 0,
            0, 2, 0, 0, 0, 0,
            // WINDOW_UPDATE
            0, 0, 4, WINDOW_UPDATE, 0, 0, 0, 0, 0,
            0, 0xef, 0x00, 0x01,
            // PRIORITY
            0, 0, 5, PRIORITY, 0, 0, 0, 0, 3,
            0, 0, 0, 0, 200,
        ];
        assert_eq!(frames, expected);
    }

    #[test]
    fn head_encodes_the_largest_length() {
        let mut buf = BytesMut::new();
        put_head(&mut buf, MAX_PAYLOAD_LEN, SETTINGS, 0, 0);
        assert_eq!(&buf[..], &[0xff, 0xff, 0xff, SETTINGS, 0, 0, 0, 0, 0]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "does not fit the length field")]
    fn head_rejects_oversized_payloads() {
        let mut buf = BytesMut::new();
        put_head(&mut buf, MAX_PAYLOAD_LEN + 1, SETTINGS, 0, 0);
    }

    #[test]
    fn priority_block_sets_the_exclusive_bit() {
        let mut buf = BytesMut::new();
        PriorityParam {
            stream_dep: 13,
            exclusive: true,
            weight: None,
        }
        .write_to(&mut buf);
        assert_eq!(&buf[..], &[0x80, 0, 0, 13, 15]);
    }
}
