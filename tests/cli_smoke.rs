use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_lintrans")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "lintrans.exe"
            } else {
                "lintrans"
            });
            p
        })
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn cli_scene_then_render_writes_gif() {
    let dir = scratch("render");
    let scene_path = dir.join("scene.json");
    let out_path = dir.join("out.gif");
    let work_dir = dir.join("tmp");

    let status = std::process::Command::new(exe())
        .arg("scene")
        .arg("--out")
        .arg(&scene_path)
        .status()
        .unwrap();
    assert!(status.success());

    let scene: lintrans::SceneSpec =
        serde_json::from_reader(std::fs::File::open(&scene_path).unwrap()).unwrap();
    assert_eq!(scene, {
        let mut reference = lintrans::SceneSpec::reference();
        reference.render.work_dir = scene.render.work_dir.clone();
        reference
    });

    let status = std::process::Command::new(exe())
        .args(["render", "--steps", "3", "--dpi", "20", "--in"])
        .arg(&scene_path)
        .arg("--work-dir")
        .arg(&work_dir)
        .arg("--out")
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(!work_dir.exists());
    assert_eq!(lintrans::read_gif_frames(&out_path).unwrap().len(), 4);
}

#[test]
fn cli_frame_writes_png() {
    let dir = scratch("frame");
    let out_path = dir.join("step.png");

    let status = std::process::Command::new(exe())
        .args([
            "frame",
            "--step",
            "30",
            "--dpi",
            "25",
            "--figure-size",
            "2",
            "3",
        ])
        .arg("--out")
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&out_path).unwrap();
    assert_eq!((img.width(), img.height()), (50, 75));
}

#[test]
fn cli_rejects_unsupported_output_format() {
    let dir = scratch("bad_format");
    let work_dir = dir.join("tmp");
    let status = std::process::Command::new(exe())
        .args(["render", "--dpi", "20", "--steps", "1"])
        .arg("--work-dir")
        .arg(&work_dir)
        .arg("--out")
        .arg(dir.join("out.mp4"))
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!work_dir.exists());
}

#[test]
fn cli_leaves_an_occupied_work_dir_alone() {
    let dir = scratch("occupied_work_dir");
    let project = dir.join("project");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(project.join("notes.txt"), b"do not delete").unwrap();
    let status = std::process::Command::new(exe())
        .args(["render", "--dpi", "20", "--steps", "1"])
        .arg("--work-dir")
        .arg(&project)
        .arg("--out")
        .arg(dir.join("out.gif"))
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(
        std::fs::read(project.join("notes.txt")).unwrap(),
        b"do not delete"
    );
    assert!(!dir.join("out.gif").exists());
}
