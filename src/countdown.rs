use timepiece_core::Countdown;

const MAX_FIELD_LEN: usize = 6;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    fn index(self) -> usize {
        match self {
            Field::Hours => 0,
            Field::Minutes => 1,
            Field::Seconds => 2,
        }
    }

    fn step(self, forward: bool) -> Field {
        match (self, forward) {
            (Field::Hours, true) | (Field::Seconds, false) => Field::Minutes,
            (Field::Minutes, true) | (Field::Hours, false) => Field::Seconds,
            (Field::Seconds, true) | (Field::Minutes, false) => Field::Hours,
        }
    }
}

/// The countdown plus its three hour/minute/second input fields. Typing only
/// edits the text; the value is committed when a field loses focus or the
/// edit is confirmed.
pub struct CountdownWidget {
    pub timer: Countdown,
    pub fields: [String; 3],
    pub editing: Option<Field>,
}

impl CountdownWidget {
    pub fn new(default_secs: i64) -> Self {
        let timer = Countdown::new(default_secs);
        let fields = timer.default_fields();
        Self {
            timer,
            fields,
            editing: None,
        }
    }

    pub fn begin_edit(&mut self) {
        if self.editing.is_none() {
            self.editing = Some(Field::Hours);
        }
    }

    /// Returns false when the character is not accepted.
    pub fn push_char(&mut self, c: char) -> bool {
        let Some(field) = self.editing else {
            return false;
        };
        if !(c.is_ascii_digit() || c == '-' || c == '.' || c == ' ') {
            return false;
        }
        let text = &mut self.fields[field.index()];
        if text.len() >= MAX_FIELD_LEN {
            return false;
        }
        text.push(c);
        true
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.editing {
            self.fields[field.index()].pop();
        }
    }

    /// Focus moves to the neighbouring field; the field being left commits.
    pub fn move_focus(&mut self, forward: bool) -> bool {
        let Some(field) = self.editing else {
            return false;
        };
        let applied = self.commit();
        self.editing = Some(field.step(forward));
        applied
    }

    pub fn finish_edit(&mut self) -> bool {
        if self.editing.take().is_none() {
            return false;
        }
        self.commit()
    }

    fn commit(&mut self) -> bool {
        let [h, m, s] = &self.fields;
        let applied = self.timer.apply_input(h, m, s);
        if applied {
            log::debug!("countdown set to {}s", self.timer.total_seconds());
        }
        applied
    }

    /// Stop, restore the default, and show the default in the fields again.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.fields = self.timer.default_fields();
        self.editing = None;
    }

    pub fn field_focused(&self, index: usize) -> bool {
        self.editing.map(Field::index) == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_all(widget: &mut CountdownWidget) {
        for field in widget.fields.iter_mut() {
            field.clear();
        }
    }

    #[test]
    fn typing_does_not_commit_until_blur() {
        let mut cd = CountdownWidget::new(1800);
        cd.begin_edit();
        clear_all(&mut cd);
        assert!(cd.push_char('1'));
        assert_eq!(cd.timer.total_seconds(), 1800);

        // leaving the hours field commits h=1, m="", s=""
        assert!(cd.move_focus(true));
        assert_eq!(cd.timer.total_seconds(), 3600);
        assert_eq!(cd.editing, Some(Field::Minutes));
    }

    #[test]
    fn all_blank_edit_is_ignored() {
        let mut cd = CountdownWidget::new(1800);
        cd.begin_edit();
        clear_all(&mut cd);
        assert!(!cd.finish_edit());
        assert_eq!(cd.timer.total_seconds(), 1800);
        assert_eq!(cd.editing, None);
    }

    #[test]
    fn rejects_letters_and_caps_length() {
        let mut cd = CountdownWidget::new(0);
        assert!(!cd.push_char('5')); // not editing
        cd.begin_edit();
        assert!(!cd.push_char('x'));
        cd.backspace();
        for _ in 0..MAX_FIELD_LEN {
            cd.push_char('9');
        }
        assert!(!cd.push_char('9'));
        assert_eq!(cd.fields[0].len(), MAX_FIELD_LEN);
    }

    #[test]
    fn reset_restores_fields_and_default() {
        let mut cd = CountdownWidget::new(1800);
        cd.begin_edit();
        cd.fields = ["0".into(), "1".into(), "5".into()];
        cd.finish_edit();
        assert_eq!(cd.timer.total_seconds(), 65);
        cd.timer.start();
        cd.reset();
        assert_eq!(cd.timer.total_seconds(), 1800);
        assert!(!cd.timer.is_running());
        assert_eq!(cd.fields, ["0", "30", "0"]);
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(Field::Seconds.step(true), Field::Hours);
        assert_eq!(Field::Hours.step(false), Field::Seconds);
        let mut cd = CountdownWidget::new(0);
        cd.begin_edit();
        assert!(cd.field_focused(0));
        cd.move_focus(false);
        assert!(cd.field_focused(2));
    }
}
