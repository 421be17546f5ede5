//! The canonical demo tree every fresh session starts from.

use husk_vfs::{FileSystem, UnitId};

/// Build the seed filesystem. Attachment order is visible through `ls`,
/// so the order here is part of the fixture.
pub fn seed_filesystem() -> FileSystem {
    let mut fs = FileSystem::new();
    let root = fs.root();

    dir(&mut fs, root, ".tmp-dir");
    file(&mut fs, root, ".hidden", "There is a hidden file.");

    let docs = dir(&mut fs, root, "docs");
    file(&mut fs, docs, "moretodo.txt", "A, B, C.");
    file(&mut fs, docs, "ok.txt", "I am ok.");
    file(&mut fs, docs, "shoplist.txt", "-Apples\n-Bananas\n-Cookies");
    let private = dir(&mut fs, docs, "private");
    file(
        &mut fs,
        private,
        "secret.txt",
        "PxNmGkl6M+jDP4AYAKZET18SEnWD5qw5LIP9174lONWslF144K9VHFIk1JA=",
    );
    dir(&mut fs, private, "opt");
    dir(&mut fs, docs, "tmp");

    let more = dir(&mut fs, root, "more");
    file(&mut fs, more, "moretodo.txt", "Don't forget this other stuff.");

    dir(&mut fs, root, "stuff");
    file(
        &mut fs,
        root,
        "cool.txt",
        "There is a hidden command in this terminal called 'secret'.",
    );

    fs
}

fn dir(fs: &mut FileSystem, parent: UnitId, name: &str) -> UnitId {
    let id = fs.create_dir(name);
    fs.attach(parent, id).unwrap();
    id
}

fn file(fs: &mut FileSystem, parent: UnitId, name: &str, content: &str) {
    let id = fs.create_file(name, content);
    fs.attach(parent, id).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fs: &FileSystem, id: UnitId) -> Vec<&str> {
        fs.children(id)
            .iter()
            .map(|&child| fs.unit(child).name.as_str())
            .collect()
    }

    #[test]
    fn root_entries_in_order() {
        let fs = seed_filesystem();
        assert_eq!(
            names(&fs, fs.root()),
            [".tmp-dir", ".hidden", "docs", "more", "stuff", "cool.txt"]
        );
    }

    #[test]
    fn docs_entries_in_order() {
        let fs = seed_filesystem();
        let docs = fs.get(&["docs"]).unwrap();
        assert_eq!(
            names(&fs, docs),
            ["moretodo.txt", "ok.txt", "shoplist.txt", "private", "tmp"]
        );
    }

    #[test]
    fn known_contents() {
        let fs = seed_filesystem();
        let shoplist = fs.get(&["docs", "shoplist.txt"]).unwrap();
        assert_eq!(fs.content(shoplist), Some("-Apples\n-Bananas\n-Cookies"));
        let cool = fs.get(&["cool.txt"]).unwrap();
        assert_eq!(
            fs.content(cool),
            Some("There is a hidden command in this terminal called 'secret'.")
        );
    }

    #[test]
    fn pointer_starts_at_root() {
        let fs = seed_filesystem();
        assert_eq!(fs.pointer(), fs.root());
        assert_eq!(fs.pwd(), "/");
    }

    #[test]
    fn nested_secret_is_reachable() {
        let fs = seed_filesystem();
        let secret = fs.get(&["docs", "private", "secret.txt"]).unwrap();
        assert!(fs.unit(secret).is_file());
    }
}
