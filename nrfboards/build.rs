use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=src/boards");

    let sources = nrfboards_build::board_sources("src/boards".as_ref())
        .unwrap_or_else(|err| panic!("cannot enumerate boards: {err}"));
    if sources.is_empty() {
        panic!("no boards found in src/boards");
    }

    let mut board_mods = File::create(out.join("board_mods.rs")).unwrap();
    for src in &sources {
        println!("cargo:rerun-if-changed={}", src.path.display());
        writeln!(&mut board_mods, "#[path=\"{}\"]", src.path.to_str().unwrap()).unwrap();
        writeln!(&mut board_mods, "mod {};", src.module).unwrap();
    }

    writeln!(&mut board_mods).unwrap();
    writeln!(&mut board_mods, "/// Identifiers of all known boards, sorted.").unwrap();
    write!(&mut board_mods, "pub const IDS: &[&str] = &[").unwrap();
    for src in &sources {
        write!(&mut board_mods, "{:?}, ", src.id).unwrap();
    }
    writeln!(&mut board_mods, "];").unwrap();

    writeln!(&mut board_mods).unwrap();
    writeln!(&mut board_mods, "/// Assembles the board with the canonical identifier `id`.").unwrap();
    writeln!(
        &mut board_mods,
        "pub(crate) fn assemble(id: &str) -> Option<Result<crate::Descriptor, crate::Error>> {{"
    )
    .unwrap();
    writeln!(&mut board_mods, "    match id {{").unwrap();
    for src in &sources {
        writeln!(
            &mut board_mods,
            "        {:?} => Some(crate::Descriptor::from_board::<{}::BoardImpl>(id)),",
            src.id, src.module
        )
        .unwrap();
    }
    writeln!(&mut board_mods, "        _ => None,").unwrap();
    writeln!(&mut board_mods, "    }}").unwrap();
    writeln!(&mut board_mods, "}}").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
