use std::path::PathBuf;

fn bin_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_gazeloop")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "gazeloop.exe"
            } else {
                "gazeloop"
            });
            p
        })
}

#[test]
fn cli_renders_gif_for_eligible_log() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let csv_path = dir.join("log.csv");
    let out_dir = dir.join("gifs");
    let _ = std::fs::remove_dir_all(&out_dir);

    std::fs::write(
        &csv_path,
        "trial_type,stimulus,participant_id,response,image_name,cogix_eye_tracking\n\
         image-keyboard-response,./assets/scene.jpg,p1,,scene.jpg,\"{\"\"samples\"\":[{\"\"x\"\":0.5,\"\"y\"\":0.5,\"\"t\"\":0},{\"\"x\"\":0.6,\"\"y\"\":0.4,\"\"t\"\":80}]}\"\n\
         custom-rating-scale,,p1,7,,\n",
    )
    .unwrap();

    let status = std::process::Command::new(bin_path())
        .args(["--input"])
        .arg(&csv_path)
        .args(["--out-dir"])
        .arg(&out_dir)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_dir.join("p1_scene_gaze.gif").exists());
}

#[test]
fn cli_exits_nonzero_when_no_trials_exist() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let csv_path = dir.join("empty_log.csv");
    std::fs::write(
        &csv_path,
        "trial_type,stimulus,participant_id,response,image_name,cogix_eye_tracking\n\
         html-keyboard-response,welcome,p1,,,\n",
    )
    .unwrap();

    let status = std::process::Command::new(bin_path())
        .args(["--input"])
        .arg(&csv_path)
        .args(["--out-dir"])
        .arg(dir.join("gifs_none"))
        .status()
        .unwrap();

    assert!(!status.success());
}
