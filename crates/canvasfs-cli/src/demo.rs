//! Seeded in-memory store for `--demo`.

use canvasfs_kernel::MemoryRemote;

pub fn demo_remote() -> MemoryRemote {
    let remote = MemoryRemote::new(1, "Demo User");

    let cs101 = remote.add_course(101, "CS101");
    remote.add_file(cs101.kind, "Lecture Slides/week1.pdf", vec![b'%'; 1024]);
    remote.add_file(cs101.kind, "Lecture Slides/week2.pdf", vec![b'%'; 2048]);
    remote.add_file(cs101.kind, "syllabus.txt", b"CS101: Introduction to Programming\n".to_vec());
    remote.mkdir_p(cs101.kind, "Assignments");

    let cs102 = remote.add_course(102, "CS102");
    remote.add_file(cs102.kind, "Notes/graphs.md", b"# Graphs\n\nBFS, DFS, Dijkstra.\n".to_vec());

    let me = remote.personal();
    remote.add_file(me.kind, "profile pictures/profile.jpg", vec![0xff; 512]);

    remote
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_has_scopes() {
        let remote = demo_remote();
        assert_eq!(remote.personal().name, "Demo User");
        assert_eq!(remote.calls().total(), 0);
    }
}
