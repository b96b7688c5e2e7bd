#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::ChatMessage;
use crate::domain::models::MessageType;
use crate::domain::models::Sender;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a ChatMessage,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn repeat_from_subtractions(text: &str, total: usize, subtractions: &[usize]) -> String {
    let count = subtractions
        .iter()
        .fold(total as i64, |acc, e| return acc - *e as i64);

    if count <= 0 {
        return "".to_string();
    }

    return text.repeat(count as usize);
}

fn char_len(text: &str) -> usize {
    return text.chars().count();
}

impl<'a> Bubble<'_> {
    pub fn new(
        message: &'a ChatMessage,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'a>> {
        let max_line_length = self.get_max_line_length();
        let mut lines: Vec<Line<'a>> = vec![];

        if !self.message.content.trim().is_empty() {
            for line in self.message.as_string_lines(max_line_length) {
                let span = Span::from(line.chars().take(max_line_length).collect::<String>());
                lines.push(self.spans_to_line(vec![span], max_line_length));
            }
        }

        for attachment in self.message.attachments() {
            let chip = self.attachment_chip(attachment.kind.label(), &attachment.name);
            let chip = chip.chars().take(max_line_length).collect::<String>();
            lines.push(self.spans_to_line(
                vec![Span::styled(
                    chip,
                    Style {
                        fg: Some(Color::LightBlue),
                        ..Style::default()
                    },
                )],
                max_line_length,
            ));
        }

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn attachment_chip(&self, label: &str, name: &str) -> String {
        return format!("[{label}] {name}");
    }

    fn title(&self) -> String {
        return format!("{} {}", self.message.sender, self.message.time());
    }

    fn spans_to_line(&self, mut spans: Vec<Span<'a>>, max_line_length: usize) -> Line<'a> {
        let line_str_len: usize = spans.iter().map(|e| return char_len(&e.content)).sum();
        let fill = repeat_from_subtractions(" ", max_line_length, &[line_str_len]);
        let formatted_line_length =
            line_str_len + char_len(&fill) + Bubble::style_config().bubble_padding;

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(self.highlight_span(format!("{fill} │")));

        let outer_bubble_padding =
            repeat_from_subtractions(" ", self.window_max_width, &[formatted_line_length]);

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let available = self.window_max_width.saturating_sub(line_border_width);

        let text_length = self.message.content.lines().map(char_len).max().unwrap_or(0);
        let chips_length = self
            .message
            .attachments()
            .iter()
            .map(|e| {
                return char_len(&self.attachment_chip(e.kind.label(), &e.name));
            })
            .max()
            .unwrap_or(0);

        let mut max_line_length = text_length.max(chips_length).min(available);

        let title_length = char_len(&self.title());
        if max_line_length < title_length {
            max_line_length = title_length;
        }

        return max_line_length;
    }

    fn wrap_lines_in_bubble(&self, lines: Vec<Line<'a>>, max_line_length: usize) -> Vec<Line<'a>> {
        let title = self.title();
        // Add 2 for the vertical bars, minus the title drawn over the top border.
        let top_fill = ["─"]
            .repeat((max_line_length + 2).saturating_sub(char_len(&title)))
            .join("");
        let top_bar = format!("╭{title}{top_fill}╮");
        let bottom_bar = format!("╰{}╯", ["─"].repeat(max_line_length + 2).join(""));
        let bar_bubble_padding = repeat_from_subtractions(
            " ",
            self.window_max_width,
            &[max_line_length, Bubble::style_config().bubble_padding],
        );

        if self.alignment == BubbleAlignment::Left {
            let mut res = vec![self.highlight_line(format!("{top_bar}{bar_bubble_padding}"))];
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{bar_bubble_padding}")));
            return res;
        }

        let mut res = vec![self.highlight_line(format!("{bar_bubble_padding}{top_bar}"))];
        res.extend(lines);
        res.push(self.highlight_line(format!("{bar_bubble_padding}{bottom_bar}")));
        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'a> {
        if self.message.message_type() == MessageType::Error {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            );
        } else if self.message.sender == Sender::System {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Rgb(138, 85, 63)), // Brown
                    ..Style::default()
                },
            );
        } else if self.message.sender == Sender::Assistant {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Cyan),
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'a> {
        return Line::from(self.highlight_span(text));
    }
}
