//! Wire-format properties of the frame codec and the streaming decoder.

use proptest::prelude::*;

use matrix_platformer::transport::{decode, encode, FrameDecoder, FrameError};
use matrix_platformer::types::{
    FrameBuffer, Rgb, FRAME_FOOTER, FRAME_HEADER, FRAME_LEN, MATRIX_HEIGHT, MATRIX_WIDTH,
};

const PIXELS: usize = MATRIX_WIDTH as usize * MATRIX_HEIGHT as usize;

fn frame_from(pixels: &[[u8; 3]]) -> FrameBuffer {
    let mut fb = FrameBuffer::new(MATRIX_WIDTH, MATRIX_HEIGHT);
    for (i, px) in pixels.iter().enumerate() {
        let x = (i % MATRIX_WIDTH as usize) as i32;
        let y = (i / MATRIX_WIDTH as usize) as i32;
        fb.set(x, y, Rgb::from(*px));
    }
    fb
}

fn any_frame() -> impl Strategy<Value = FrameBuffer> {
    proptest::collection::vec(any::<[u8; 3]>(), PIXELS).prop_map(|px| frame_from(&px))
}

#[test]
fn extreme_buffers_keep_the_framing() {
    for color in [Rgb::BLACK, Rgb::WHITE] {
        let bytes = encode(&FrameBuffer::filled(MATRIX_WIDTH, MATRIX_HEIGHT, color));
        assert_eq!(bytes.len(), 3028);
        assert_eq!(bytes[..2], FRAME_HEADER);
        assert_eq!(bytes[FRAME_LEN - 2..], FRAME_FOOTER);
        let fill = color.r;
        assert!(bytes[2..FRAME_LEN - 2].iter().all(|&b| b == fill));
    }
}

#[test]
fn payload_is_row_major_from_top_left() {
    let mut fb = FrameBuffer::new(MATRIX_WIDTH, MATRIX_HEIGHT);
    fb.set(0, 0, Rgb::new(1, 2, 3));
    fb.set(1, 0, Rgb::new(4, 5, 6));
    fb.set(0, 1, Rgb::new(7, 8, 9));
    let bytes = encode(&fb);
    assert_eq!(bytes[2..8], [1u8, 2, 3, 4, 5, 6]);
    let row1 = 2 + 3 * MATRIX_WIDTH as usize;
    assert_eq!(bytes[row1..row1 + 3], [7u8, 8, 9]);
}

#[test]
fn malformed_frames_are_rejected() {
    let mut bytes = encode(&FrameBuffer::new(MATRIX_WIDTH, MATRIX_HEIGHT));
    assert_eq!(
        decode(&bytes[..100], MATRIX_WIDTH, MATRIX_HEIGHT),
        Err(FrameError::WrongLength {
            expected: FRAME_LEN,
            actual: 100
        })
    );
    bytes[FRAME_LEN - 1] = 0;
    assert_eq!(
        decode(&bytes, MATRIX_WIDTH, MATRIX_HEIGHT),
        Err(FrameError::BadFooter([0xFD, 0x00]))
    );
    bytes[0] = 0;
    assert!(matches!(
        decode(&bytes, MATRIX_WIDTH, MATRIX_HEIGHT),
        Err(FrameError::BadHeader(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_frame_is_fixed_length_and_framed(fb in any_frame()) {
        let bytes = encode(&fb);
        prop_assert_eq!(bytes.len(), FRAME_LEN);
        prop_assert_eq!(&bytes[..2], &FRAME_HEADER[..]);
        prop_assert_eq!(&bytes[FRAME_LEN - 2..], &FRAME_FOOTER[..]);
        prop_assert_eq!(decode(&bytes, MATRIX_WIDTH, MATRIX_HEIGHT), Ok(fb));
    }

    #[test]
    fn decoder_realigns_after_noise(
        fb in any_frame(),
        noise in proptest::collection::vec(0u8..0xFF, 0..64),
        chunk in 1usize..700,
    ) {
        let mut stream = noise.clone();
        stream.extend(encode(&fb));
        stream.extend(encode(&fb));

        let mut decoder = FrameDecoder::new(MATRIX_WIDTH, MATRIX_HEIGHT);
        let mut frames = Vec::new();
        for part in stream.chunks(chunk) {
            decoder.push(part);
            while let Some(frame) = decoder.next_frame() {
                frames.push(frame);
            }
        }
        prop_assert_eq!(frames.len(), 2);
        prop_assert!(frames.iter().all(|f| f == &fb));
        prop_assert_eq!(decoder.skipped(), noise.len() as u64);
        prop_assert_eq!(decoder.pending(), 0);
    }
}
