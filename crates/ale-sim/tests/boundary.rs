//! Buffer-oriented handle API.

mod common;

use ale_core::boundary::{decode_state, encode_state, encode_state_len};
use ale_core::{Action, AleError};
use ale_sim::SimHandle;
use common::joystick_rom;

fn loaded_handle() -> (SimHandle, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catch.bin");
    std::fs::write(&path, joystick_rom()).expect("write rom");
    let mut handle = SimHandle::new();
    handle
        .load_rom(path.to_str().expect("utf-8 path"))
        .expect("load");
    (handle, dir)
}

#[test]
fn actions_cross_as_integer_codes() {
    let (mut handle, _dir) = loaded_handle();
    assert_eq!(handle.act(Action::PlayerAFire.code()).expect("act"), 0);
    assert_eq!(handle.frame_number(), 1);
    assert_eq!(handle.episode_frame_number(), 1);
    assert!(!handle.game_over());
    assert!(matches!(handle.act(38), Err(AleError::InvalidAction(38))));
    assert_eq!(handle.frame_number(), 1);
}

#[test]
fn action_sets_fill_caller_buffers() {
    let (handle, _dir) = loaded_handle();
    let mut legal = vec![-1; handle.legal_action_size()];
    assert_eq!(handle.fill_legal_action_set(&mut legal).expect("fill"), 18);
    assert_eq!(legal, (0..18).collect::<Vec<_>>());

    let size = handle.minimal_action_size().expect("loaded");
    let mut minimal = vec![-1; size + 2];
    assert_eq!(handle.fill_minimal_action_set(&mut minimal).expect("fill"), size);
    assert_eq!(&minimal[size..], &[-1, -1]);

    let mut short = vec![-1; size - 1];
    assert!(matches!(
        handle.fill_minimal_action_set(&mut short),
        Err(AleError::BufferTooSmall { .. })
    ));
    assert!(short.iter().all(|&c| c == -1));
}

#[test]
fn observations_fill_caller_buffers() {
    let (mut handle, _dir) = loaded_handle();
    handle.act(Action::PlayerANoop.code()).expect("act");
    let pixels = handle.screen_width() * handle.screen_height();

    let mut raw = vec![0; pixels];
    assert_eq!(handle.fill_screen(&mut raw).expect("fill"), pixels);
    assert_eq!(raw, handle.interface().screen().as_slice());

    let mut rgb = vec![0; pixels * 3];
    assert_eq!(handle.fill_screen_rgb(&mut rgb).expect("fill"), pixels * 3);
    assert_eq!(rgb, handle.interface().screen_rgb_vec());

    let mut gray = vec![0; pixels];
    assert_eq!(handle.fill_screen_grayscale(&mut gray).expect("fill"), pixels);

    let mut ram = vec![0; handle.ram_size()];
    assert_eq!(handle.fill_ram(&mut ram).expect("fill"), 128);
    assert_eq!(ram, handle.interface().ram().as_slice());

    let mut short_ram = [0u8; 127];
    assert!(matches!(
        handle.fill_ram(&mut short_ram),
        Err(AleError::BufferTooSmall { required: 128, provided: 127 })
    ));
}

#[test]
fn encode_one_byte_short_is_refused() {
    let (mut handle, _dir) = loaded_handle();
    handle.act(Action::PlayerARight.code()).expect("act");
    let state = handle.clone_system_state().expect("clone");
    let len = encode_state_len(&state);

    let mut short = vec![0x5A; len - 1];
    assert!(matches!(
        encode_state(&state, &mut short),
        Err(AleError::BufferTooSmall { required, provided }) if required == len && provided == len - 1
    ));
    assert!(short.iter().all(|&b| b == 0x5A));

    let mut exact = vec![0; len];
    assert_eq!(encode_state(&state, &mut exact).expect("encode"), len);
    let decoded = decode_state(&exact).expect("decode");
    assert_eq!(decoded, state);

    handle.act(Action::PlayerARight.code()).expect("act");
    handle.restore_system_state(&decoded).expect("restore");
    assert_eq!(handle.frame_number(), state.frame_number());
}

#[test]
fn decode_rejects_damaged_bytes() {
    let (handle, _dir) = loaded_handle();
    let state = handle.clone_state().expect("clone");
    let mut bytes = vec![0; encode_state_len(&state)];
    encode_state(&state, &mut bytes).expect("encode");
    bytes[4] = 0xFF;
    assert!(matches!(decode_state(&bytes), Err(AleError::CorruptState(_))));
    assert!(matches!(decode_state(&[]), Err(AleError::CorruptState(_))));
}

#[test]
fn settings_by_key() {
    let mut handle = SimHandle::new();
    assert_eq!(handle.get_int("random_seed").expect("key"), 0);
    handle.set_int("random_seed", 99).expect("key");
    handle.set_float("repeat_action_probability", 0.25).expect("key");
    handle.set_bool("truncate_on_loss_of_life", true).expect("key");
    handle.set_string("palette", "alternate").expect("key");
    assert_eq!(handle.get_string("palette").expect("key"), "alternate");
    assert!(handle.get_bool("truncate_on_loss_of_life").expect("key"));
    assert!((handle.get_float("repeat_action_probability").expect("key") - 0.25).abs() < 1e-6);
    assert!(handle.set_int("frameskip", 4).is_err());

    // Loading through the handle pins the seed.
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catch.bin");
    std::fs::write(&path, joystick_rom()).expect("write rom");
    handle
        .load_rom(path.to_str().expect("utf-8 path"))
        .expect("load");
    assert_eq!(handle.get_int("random_seed").expect("key"), 0);
    assert_eq!(handle.interface().active_settings().random_seed, 0);
}

#[test]
fn state_stack_and_png_through_handle() {
    let (mut handle, dir) = loaded_handle();
    handle.save_state().expect("save");
    handle.act(Action::PlayerARight.code()).expect("act");
    handle.load_state().expect("load");
    assert_eq!(handle.frame_number(), 0);
    assert_eq!(handle.lives().expect("loaded"), 3);

    let png = dir.path().join("screen.png");
    handle
        .save_screen_png(png.to_str().expect("utf-8 path"))
        .expect("export");
    assert!(png.exists());

    handle.reset_game().expect("reset");
    assert_eq!(handle.episode_frame_number(), 0);
}
