use hashdev::murmur3_32;

use super::*;

fn run(dev: &Device, minor: ChannelId, ops: &[Op]) -> (Report, Vec<String>) {
    let mut out = Vec::new();
    let report = Driver::new(dev, minor).run(ops, &mut out).unwrap();
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    (report, lines)
}

#[test]
fn parse_ops() {
    assert_eq!("open:rw".parse(), Ok(Op::Open(Access::READ | Access::WRITE)));
    assert_eq!("open:none".parse(), Ok(Op::Open(Mode::empty())));
    assert_eq!("write:a:b".parse(), Ok(Op::Write("a:b".to_owned())));
    assert_eq!("read:10".parse(), Ok(Op::Read(10)));
    assert_eq!("seed:7".parse(), Ok(Op::Seed(7)));
    assert_eq!("restart".parse(), Ok(Op::Restart));

    assert!("open:x".parse::<Op>().is_err());
    assert!("read:-1".parse::<Op>().is_err());
    assert!("close:1".parse::<Op>().is_err());
    assert!("poll".parse::<Op>().is_err());
}

#[test]
fn display_parses_back() {
    for op in ["open:w", "close", "read:5", "reset", "seed:3"] {
        assert_eq!(op.parse::<Op>().unwrap().to_string(), op);
    }
}

#[test]
fn default_script() {
    let dev = Device::new();
    let (report, lines) = run(&dev, 3, &super::default_script());

    assert_eq!(
        report,
        Report {
            frames: 4,
            mismatches: 0,
            errors: 0
        }
    );
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[1], "write:\"hello world whahtttata\" -> 22 bytes");
    assert!(lines[2].starts_with("read:10 -> 14 bytes"));
    assert!(lines[2].ends_with("data=\"hello worl\""));
    assert!(lines[5].ends_with("data=\"httta\""));
    assert!(lines[8].ends_with("data=\"tahell of world whahtttata\""));
}

#[test]
fn restart_after_reopen() {
    let dev = Device::new();
    let ops: Vec<Op> = ["open:w", "write:abc", "restart", "close", "open:r", "read:10"]
        .iter()
        .map(|op| op.parse().unwrap())
        .collect();
    let (report, lines) = run(&dev, 3, &ops);

    assert_eq!(report.frames, 1);
    let hash = murmur3_32(b"abc", 0);
    assert_eq!(
        lines[5],
        format!("read:10 -> 7 bytes, hash={hash:#010x} ok, data=\"abc\"")
    );
}

#[test]
fn errors_do_not_stop_script() {
    let dev = Device::with_capacity(4);
    let ops = [
        Op::Read(1),
        Op::Open(Access::READ | Access::WRITE),
        Op::Write(String::new()),
        Op::Write("hello".to_owned()),
        Op::Write("hi".to_owned()),
        Op::Read(2),
    ];
    let (report, lines) = run(&dev, 0, &ops);

    assert_eq!(report.errors, 3);
    assert_eq!(report.frames, 1);
    assert_eq!(lines[0], "read:1 -> error: bad file descriptor (-9)");
    assert_eq!(lines[2], "write:\"\" -> error: invalid argument (-22)");
    assert_eq!(
        lines[3],
        "write:\"hello\" -> error: no space left in channel buffer (-28)"
    );
}

#[test]
fn installed_seed_verifies() {
    let dev = Device::new();
    let driver = Driver::new(&dev, 5);
    driver.install_seed(99).unwrap();

    let ops = [
        Op::Open(Access::READ | Access::WRITE),
        Op::Write("abc".to_owned()),
        Op::Read(3),
        Op::Seed(1),
        Op::Restart,
        Op::Read(3),
    ];
    let (report, lines) = run(&dev, 5, &ops);

    assert_eq!(report.mismatches, 0);
    assert!(lines[2].contains(&format!("{:#010x}", murmur3_32(b"abc", 99))));
    assert!(lines[5].contains(&format!("{:#010x}", murmur3_32(b"abc", 1))));
}
