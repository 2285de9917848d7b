use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn readie_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("readie"));
	cmd.env("NO_COLOR", "1").env_remove("READIE_LOG");
	cmd
}
