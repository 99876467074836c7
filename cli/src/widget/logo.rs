use ratatui::text::{ Line, Text };

const LOGO: [&str; 5] = [
  " ___ _      ___   _____ ___ ",
  "| _ \\ |    /_\\ \\ / / __| _ \\",
  "|  _/ |__ / _ \\ V /| _||   /",
  "|_| |____/_/ \\_\\_| |___|_|_\\",
  "",
];

pub fn logo() -> Text<'static> {
  let lines: Vec<Line> = LOGO.iter().map(|s| Line::raw(*s)).collect();
  Text::from(lines)
}
